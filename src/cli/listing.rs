use chrono::{DateTime, Datelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{json, Value};
use std::str::FromStr;

use crate::types::Entity;

/// `October 19th, 2026`
pub fn format_date(date: &DateTime<Utc>) -> String {
    format!("{} {}, {}", date.format("%B"), ordinal(date.day()), date.year())
}

pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

/// `$1,234.50` style, for JSON numbers or numeric strings
pub fn format_price(value: &Value) -> String {
    let decimal = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    };
    let Some(decimal) = decimal else {
        return String::new();
    };

    let rounded = decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if decimal.is_sign_negative() { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

fn text(row: &Value, pointer: &str) -> String {
    match row.pointer(pointer) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn created(row: &Value) -> String {
    row.get("createdAt")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|date| format_date(&date.with_timezone(&Utc)))
        .unwrap_or_default()
}

/// One table row: the id (for row actions) plus the rendered cells
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub description: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Shape a fetched collection the way the dashboard list pages do
    pub fn for_entity(entity: Entity, records: &[Value]) -> Self {
        let headers: Vec<&'static str> = match entity {
            Entity::Billboard => vec!["Label", "Date"],
            Entity::Category => vec!["Name", "Billboard", "Date"],
            Entity::Color | Entity::Size => vec!["Name", "Value", "Date"],
            Entity::Product => vec![
                "Name", "Archived", "Featured", "Price", "Category", "Size", "Color", "Date",
            ],
        };

        let rows = records
            .iter()
            .map(|row| {
                let cells = match entity {
                    Entity::Billboard => vec![text(row, "/label"), created(row)],
                    Entity::Category => vec![text(row, "/name"), text(row, "/billboard/label"), created(row)],
                    Entity::Color | Entity::Size => vec![text(row, "/name"), text(row, "/value"), created(row)],
                    Entity::Product => vec![
                        text(row, "/name"),
                        text(row, "/isArchived"),
                        text(row, "/isFeatured"),
                        row.get("price").map(format_price).unwrap_or_default(),
                        text(row, "/category/name"),
                        text(row, "/size/name"),
                        text(row, "/color/value"),
                        created(row),
                    ],
                };
                Row {
                    id: text(row, "/id"),
                    cells,
                }
            })
            .collect();

        let plural = entity.segment();
        let mut title = plural.to_string();
        if let Some(first) = title.get_mut(0..1) {
            first.make_ascii_uppercase();
        }

        Self {
            title: format!("{} ({})", title, records.len()),
            description: format!("Manage {} for your store", plural),
            headers,
            rows,
        }
    }

    /// Plain-text rendering with padded columns; the id column comes first
    pub fn render_text(&self) -> String {
        let mut headers = vec!["ID"];
        headers.extend(self.headers.iter().copied());

        let body: Vec<Vec<&str>> = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.id.as_str()];
                cells.extend(row.cells.iter().map(String::as_str));
                cells
            })
            .collect();

        let widths: Vec<usize> = (0..headers.len())
            .map(|i| {
                body.iter()
                    .map(|cells| cells[i].chars().count())
                    .chain(std::iter::once(headers[i].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[&str]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![self.title.clone(), self.description.clone(), String::new(), line(&headers)];
        if body.is_empty() {
            out.push("No results.".to_string());
        }
        out.extend(body.iter().map(|cells| line(cells)));
        out.join("\n")
    }

    pub fn to_json(&self) -> Value {
        json!({
            "title": self.title,
            "headers": self.headers,
            "rows": self.rows.iter().map(|r| json!({ "id": r.id, "cells": r.cells })).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn ordinals() {
        let rendered: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 31].iter().map(|d| ordinal(*d)).collect();
        assert_eq!(
            rendered,
            vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "23rd", "31st"]
        );
    }

    #[test]
    fn dates_use_month_name_and_ordinal_day() {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        assert_eq!(format_date(&date), "October 19th, 2026");
        let date = Utc.with_ymd_and_hms(2024, 3, 22, 0, 0, 0).unwrap();
        assert_eq!(format_date(&date), "March 22nd, 2024");
    }

    #[test]
    fn prices_are_currency_formatted() {
        assert_eq!(format_price(&json!(59.9)), "$59.90");
        assert_eq!(format_price(&json!(1234567)), "$1,234,567.00");
        assert_eq!(format_price(&json!("12.345")), "$12.35");
        assert_eq!(format_price(&json!(null)), "");
    }

    #[test]
    fn product_rows_pull_nested_names() {
        let records = vec![json!({
            "id": "p1",
            "name": "Tee",
            "price": 20,
            "isFeatured": true,
            "isArchived": false,
            "category": { "name": "Shirts" },
            "size": { "name": "Large" },
            "color": { "value": "#000000" },
            "createdAt": "2026-01-01T12:00:00Z"
        })];
        let table = Table::for_entity(Entity::Product, &records);
        assert_eq!(table.title, "Products (1)");
        assert_eq!(
            table.rows[0].cells,
            vec!["Tee", "false", "true", "$20.00", "Shirts", "Large", "#000000", "January 1st, 2026"]
        );
    }

    #[test]
    fn empty_table_says_so() {
        let table = Table::for_entity(Entity::Billboard, &[]);
        let text = table.render_text();
        assert!(text.starts_with("Billboards (0)\nManage billboards for your store"));
        assert!(text.ends_with("No results."));
    }
}
