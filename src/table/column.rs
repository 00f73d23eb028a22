//! Column descriptors for the market table

use crate::format::{format_currency, format_large_number, format_percent};
use crate::types::MarketRecord;
use std::cmp::Ordering;
use std::fmt;

/// Record field a column reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Rank,
    Name,
    Symbol,
    Id,
    Price,
    Change24h,
    MarketCap,
    Volume,
}

impl Field {
    /// Raw value of this field on `record`
    pub fn value(&self, record: &MarketRecord) -> CellValue {
        match self {
            Field::Rank => CellValue::number(record.market_cap_rank.map(f64::from)),
            Field::Name => CellValue::Text(record.name.clone()),
            Field::Symbol => CellValue::Text(record.symbol.clone()),
            Field::Id => CellValue::Text(record.id.clone()),
            Field::Price => CellValue::number(record.current_price),
            Field::Change24h => CellValue::number(record.price_change_percentage_24h),
            Field::MarketCap => CellValue::number(record.market_cap),
            Field::Volume => CellValue::number(record.total_volume),
        }
    }

    /// Upstream JSON key
    pub fn key(&self) -> &'static str {
        match self {
            Field::Rank => "market_cap_rank",
            Field::Name => "name",
            Field::Symbol => "symbol",
            Field::Id => "id",
            Field::Price => "current_price",
            Field::Change24h => "price_change_percentage_24h",
            Field::MarketCap => "market_cap",
            Field::Volume => "total_volume",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw cell value used for sorting and export
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    fn number(value: Option<f64>) -> Self {
        match value {
            Some(v) if !v.is_nan() => CellValue::Number(v),
            _ => CellValue::Missing,
        }
    }

    /// Natural order; missing values sort after present ones
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (CellValue::Missing, CellValue::Missing) => Ordering::Equal,
            (CellValue::Missing, _) => Ordering::Greater,
            (_, CellValue::Missing) => Ordering::Less,
            (CellValue::Number(_), CellValue::Text(_)) => Ordering::Less,
            (CellValue::Text(_), CellValue::Number(_)) => Ordering::Greater,
        }
    }

    /// Plain text used in CSV export; missing values export as empty
    pub fn to_export_string(&self) -> String {
        match self {
            CellValue::Number(v) => v.to_string(),
            CellValue::Text(text) => text.clone(),
            CellValue::Missing => String::new(),
        }
    }
}

/// Typed column descriptor
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub field: Field,
    pub label: &'static str,
    /// Initial width
    pub size: u32,
    pub min_size: u32,
    pub max_size: u32,
    pub sortable: bool,
    /// Takes part in the global filter
    pub searchable: bool,
    /// Display form of the cell
    pub render: fn(&MarketRecord) -> String,
}

impl ColumnDef {
    pub fn value(&self, record: &MarketRecord) -> CellValue {
        self.field.value(record)
    }

    pub fn render(&self, record: &MarketRecord) -> String {
        (self.render)(record)
    }

    /// Lower-cased text the global filter ranks against
    ///
    /// The coin column matches on name, symbol and id.
    pub fn search_text(&self, record: &MarketRecord) -> String {
        match self.field {
            Field::Name => record.searchable_text(),
            _ => self.value(record).to_export_string().to_lowercase(),
        }
    }

    /// Clamps a requested width into this column's bounds
    pub fn clamp_width(&self, width: u32) -> u32 {
        width.clamp(self.min_size, self.max_size.max(self.min_size))
    }
}

fn render_rank(record: &MarketRecord) -> String {
    record
        .market_cap_rank
        .map(|rank| rank.to_string())
        .unwrap_or_default()
}

fn render_coin(record: &MarketRecord) -> String {
    format!("{} ({})", record.name, record.symbol.to_uppercase())
}

fn render_price(record: &MarketRecord) -> String {
    record.current_price.map(format_currency).unwrap_or_default()
}

fn render_change(record: &MarketRecord) -> String {
    record
        .price_change_percentage_24h
        .map(format_percent)
        .unwrap_or_default()
}

fn render_market_cap(record: &MarketRecord) -> String {
    record.market_cap.map(format_large_number).unwrap_or_default()
}

fn render_volume(record: &MarketRecord) -> String {
    record
        .total_volume
        .map(format_large_number)
        .unwrap_or_default()
}

/// Default market table columns
///
/// Rank and Coin are narrower when the favorites toggle shares the row.
pub fn market_columns(show_favorites: bool) -> Vec<ColumnDef> {
    vec![
        ColumnDef {
            field: Field::Rank,
            label: "Rank",
            size: if show_favorites { 60 } else { 80 },
            min_size: 50,
            max_size: u32::MAX,
            sortable: true,
            searchable: false,
            render: render_rank,
        },
        ColumnDef {
            field: Field::Name,
            label: "Coin",
            size: if show_favorites { 280 } else { 320 },
            min_size: 200,
            max_size: u32::MAX,
            sortable: true,
            searchable: true,
            render: render_coin,
        },
        ColumnDef {
            field: Field::Price,
            label: "Price",
            size: 400,
            min_size: 150,
            max_size: 700,
            sortable: true,
            searchable: false,
            render: render_price,
        },
        ColumnDef {
            field: Field::Change24h,
            label: "24h Change",
            size: 300,
            min_size: 100,
            max_size: 400,
            sortable: true,
            searchable: false,
            render: render_change,
        },
        ColumnDef {
            field: Field::MarketCap,
            label: "Market Cap",
            size: 130,
            min_size: 100,
            max_size: 200,
            sortable: true,
            searchable: false,
            render: render_market_cap,
        },
        ColumnDef {
            field: Field::Volume,
            label: "Volume (24h)",
            size: 130,
            min_size: 100,
            max_size: 200,
            sortable: true,
            searchable: false,
            render: render_volume,
        },
    ]
}
