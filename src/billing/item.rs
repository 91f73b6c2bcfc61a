use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::numeric::parse_non_negative;
use crate::errors::ValidationError;

pub const DEFAULT_ITEM_DESCRIPTION: &str =
    "Providing and fixing of Table with 12mm plywood with necessary laminate and hardware";
pub const DEFAULT_PRICE_PER_UNIT: f64 = 1250.0;

/// Pricing basis of a line item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    /// Priced per square foot of `width × height`.
    #[default]
    Sft,
    /// Flat price; dimensions are ignored.
    Lump,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Sft => f.write_str("Sft"),
            Unit::Lump => f.write_str("Lump"),
        }
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sft" => Ok(Unit::Sft),
            "lump" => Ok(Unit::Lump),
            _ => Err(ValidationError::UnknownUnit(s.trim().to_string())),
        }
    }
}

/// Editable attribute of a [`LineItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Particular,
    Description,
    Unit,
    Width,
    Height,
    PricePerUnit,
}

impl ItemField {
    pub const ALL: [ItemField; 6] = [
        ItemField::Particular,
        ItemField::Description,
        ItemField::Unit,
        ItemField::Width,
        ItemField::Height,
        ItemField::PricePerUnit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ItemField::Particular => "particular",
            ItemField::Description => "description",
            ItemField::Unit => "unit",
            ItemField::Width => "width",
            ItemField::Height => "height",
            ItemField::PricePerUnit => "price",
        }
    }

    /// Whether a change to this field can alter the item total.
    pub fn affects_total(self) -> bool {
        !matches!(self, ItemField::Particular | ItemField::Description)
    }
}

impl FromStr for ItemField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "particular" => Ok(ItemField::Particular),
            "description" | "desc" => Ok(ItemField::Description),
            "unit" => Ok(ItemField::Unit),
            "width" => Ok(ItemField::Width),
            "height" => Ok(ItemField::Height),
            "price" | "price_per_unit" | "rate" => Ok(ItemField::PricePerUnit),
            other => {
                let known: Vec<&str> = ItemField::ALL.iter().map(|field| field.name()).collect();
                Err(ValidationError::Other(format!(
                    "unknown item field `{other}` (expected {})",
                    known.join(", ")
                )))
            }
        }
    }
}

/// One priced row of a bill.
///
/// `total` is derived from the pricing fields and is only written through
/// [`LineItem::refresh_total`], which every mutator calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "StoredLineItem")]
pub struct LineItem {
    pub particular: String,
    pub description: String,
    unit: Unit,
    width: f64,
    height: f64,
    price_per_unit: f64,
    total: f64,
}

impl LineItem {
    pub fn new(
        particular: impl Into<String>,
        description: impl Into<String>,
        unit: Unit,
        price_per_unit: f64,
    ) -> Self {
        let mut item = Self {
            particular: particular.into(),
            description: description.into(),
            unit,
            width: 0.0,
            height: 0.0,
            price_per_unit: sanitize(price_per_unit),
            total: 0.0,
        };
        item.refresh_total();
        item
    }

    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.width = sanitize(width);
        self.height = sanitize(height);
        self.refresh_total();
        self
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn price_per_unit(&self) -> f64 {
        self.price_per_unit
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Square footage for `Sft` items; `None` for lump-sum items.
    pub fn computed_area(&self) -> Option<f64> {
        match self.unit {
            Unit::Sft => Some(self.width * self.height),
            Unit::Lump => None,
        }
    }

    /// Parses `raw` for `field` and applies it. The item is left untouched
    /// when parsing fails or the resulting total would not be finite.
    pub fn set_field(&mut self, field: ItemField, raw: &str) -> Result<(), ValidationError> {
        let mut candidate = self.clone();
        match field {
            ItemField::Particular => candidate.particular = raw.trim().to_string(),
            ItemField::Description => candidate.description = raw.trim().to_string(),
            ItemField::Unit => candidate.unit = raw.parse()?,
            ItemField::Width => candidate.width = parse_non_negative("width", raw)?,
            ItemField::Height => candidate.height = parse_non_negative("height", raw)?,
            ItemField::PricePerUnit => {
                candidate.price_per_unit = parse_non_negative("price_per_unit", raw)?
            }
        }
        if field.affects_total() {
            candidate.refresh_total();
            if !candidate.total.is_finite() {
                return Err(ValidationError::InvalidNumber {
                    field: field.name(),
                    value: raw.trim().to_string(),
                });
            }
        }
        *self = candidate;
        Ok(())
    }

    pub fn refresh_total(&mut self) {
        self.total = crate::billing::calculator::recompute_item_total(self);
    }
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem::new(
            "",
            DEFAULT_ITEM_DESCRIPTION,
            Unit::Sft,
            DEFAULT_PRICE_PER_UNIT,
        )
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Persisted shape; the total is never trusted from disk.
#[derive(Deserialize)]
struct StoredLineItem {
    #[serde(default)]
    particular: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    unit: Unit,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    price_per_unit: f64,
}

impl From<StoredLineItem> for LineItem {
    fn from(stored: StoredLineItem) -> Self {
        LineItem::new(
            stored.particular,
            stored.description,
            stored.unit,
            stored.price_per_unit,
        )
        .with_dimensions(stored.width, stored.height)
    }
}
