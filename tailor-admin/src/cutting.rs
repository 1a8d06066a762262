//! Cutting jobs, entered through a step wizard.

use std::str::FromStr;

use rust_decimal::Decimal;
use tailor_ui::validation::{Draft, FieldError, Schema, ValidationResult};
use tailor_ui::wizard::StepForm;

/// Fields per wizard step as `(key, label)`.
pub const STEP_FIELDS: &[&[(&str, &str)]] = &[
    &[
        ("style_no", "Style no."),
        ("buyer", "Buyer"),
        ("order_qty", "Order qty"),
    ],
    &[
        ("fabric", "Fabric"),
        ("color", "Color"),
        ("marker_length", "Marker length (m)"),
    ],
    &[("plies", "Plies"), ("size_ratio", "Size ratio")],
    &[],
];

/// A cutting job ready to be issued to the cutting floor.
#[derive(Debug, Clone, PartialEq)]
pub struct CuttingJob {
    pub job_no: String,
    pub style_no: String,
    pub buyer: String,
    pub order_qty: u32,
    pub fabric: String,
    pub color: String,
    pub marker_length: Decimal,
    pub plies: u32,
    /// Garments per size in one marker, e.g. `[("M", 2), ("L", 2)]`.
    pub ratio: Vec<(String, u32)>,
}

impl CuttingJob {
    /// Garments cut from one full lay.
    pub fn pieces_per_lay(&self) -> u64 {
        u64::from(self.plies) * self.ratio.iter().map(|(_, n)| u64::from(*n)).sum::<u64>()
    }
}

/// Largest garment count for one size in a marker.
pub const MAX_RATIO_COUNT: u32 = 1000;

const RATIO_MESSAGE: &str = "Use SIZE:COUNT with counts 1-1000, e.g. S:1, M:2";

/// Parse `"S:1, M:2, L:2"`. Sizes must be unique and counts within
/// `1..=MAX_RATIO_COUNT`.
pub fn parse_ratio(text: &str) -> Option<Vec<(String, u32)>> {
    let mut ratio: Vec<(String, u32)> = Vec::new();
    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (size, count) = part.split_once(':')?;
        let size = size.trim().to_uppercase();
        let count: u32 = count.trim().parse().ok()?;
        if size.is_empty()
            || !(1..=MAX_RATIO_COUNT).contains(&count)
            || ratio.iter().any(|(s, _)| *s == size)
        {
            return None;
        }
        ratio.push((size, count));
    }
    if ratio.is_empty() { None } else { Some(ratio) }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuttingJobForm {
    pub style_no: String,
    pub buyer: String,
    pub order_qty: String,
    pub fabric: String,
    pub color: String,
    pub marker_length: String,
    pub plies: String,
    pub size_ratio: String,
}

impl CuttingJobForm {
    pub fn value(&self, key: &str) -> &str {
        match key {
            "style_no" => &self.style_no,
            "buyer" => &self.buyer,
            "order_qty" => &self.order_qty,
            "fabric" => &self.fabric,
            "color" => &self.color,
            "marker_length" => &self.marker_length,
            "plies" => &self.plies,
            "size_ratio" => &self.size_ratio,
            _ => "",
        }
    }

    pub fn value_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "style_no" => Some(&mut self.style_no),
            "buyer" => Some(&mut self.buyer),
            "order_qty" => Some(&mut self.order_qty),
            "fabric" => Some(&mut self.fabric),
            "color" => Some(&mut self.color),
            "marker_length" => Some(&mut self.marker_length),
            "plies" => Some(&mut self.plies),
            "size_ratio" => Some(&mut self.size_ratio),
            _ => None,
        }
    }

    fn step_schema(step: usize) -> Schema<Self> {
        let schema = Schema::new();
        match step {
            0 => schema
                .field("style_no", |f: &Self| f.style_no.trim().to_uppercase())
                .required("Style no. is required")
                .pattern(r"^[A-Z]{2,4}-\d{2,6}$", "Style no. must look like ST-1024")
                .field("buyer", |f: &Self| f.buyer.trim().to_string())
                .required("Buyer is required")
                .field("order_qty", |f: &Self| f.order_qty.trim().to_string())
                .required("Order quantity is required")
                .pattern(r"^\d+$", "Order quantity must be a whole number")
                .range(Decimal::ONE, Decimal::from(1_000_000), "Order quantity is out of range"),
            1 => schema
                .field("fabric", |f: &Self| f.fabric.trim().to_string())
                .required("Fabric is required")
                .field("color", |f: &Self| f.color.trim().to_string())
                .required("Color is required")
                .field("marker_length", |f: &Self| f.marker_length.trim().to_string())
                .required("Marker length is required")
                .numeric("Marker length must be a number")
                .range(
                    Decimal::new(1, 1),
                    Decimal::from(50),
                    "Marker length must be between 0.1 and 50 m",
                ),
            2 => schema
                .field("plies", |f: &Self| f.plies.trim().to_string())
                .required("Plies are required")
                .pattern(r"^\d+$", "Plies must be a whole number")
                .range(Decimal::ONE, Decimal::from(500), "Plies must be between 1 and 500")
                .field("size_ratio", |f: &Self| f.size_ratio.clone())
                .required("Size ratio is required")
                .rule(|v| parse_ratio(v).is_some(), RATIO_MESSAGE),
            _ => schema,
        }
    }
}

impl StepForm for CuttingJobForm {
    const STEPS: &'static [&'static str] = &["Order", "Fabric", "Lay", "Review"];

    fn validate_step(&self, step: usize) -> ValidationResult {
        Self::step_schema(step).validate(self)
    }
}

impl Draft for CuttingJobForm {
    type Output = CuttingJob;

    /// Per-step rules are checked by the wizard; this covers the payload
    /// fields once more before building.
    fn schema() -> Schema<Self> {
        Schema::new()
            .field("style_no", |f: &Self| f.style_no.trim().to_string())
            .required("Style no. is required")
            .field("size_ratio", |f: &Self| f.size_ratio.clone())
            .required("Size ratio is required")
    }

    fn build(&self) -> Result<CuttingJob, FieldError> {
        let whole = |key: &str, value: &str| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| FieldError::new(key, "Must be a whole number"))
        };
        let marker_length = Decimal::from_str(self.marker_length.trim())
            .map_err(|_| FieldError::new("marker_length", "Marker length must be a number"))?;
        let ratio = parse_ratio(&self.size_ratio)
            .ok_or_else(|| FieldError::new("size_ratio", RATIO_MESSAGE))?;

        let id = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        Ok(CuttingJob {
            job_no: format!("CJ-{}", &id[..8]),
            style_no: self.style_no.trim().to_uppercase(),
            buyer: self.buyer.trim().to_string(),
            order_qty: whole("order_qty", &self.order_qty)?,
            fabric: self.fabric.trim().to_string(),
            color: self.color.trim().to_string(),
            marker_length,
            plies: whole("plies", &self.plies)?,
            ratio,
        })
    }
}
