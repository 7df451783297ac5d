//! Spreadsheet export of orders and analytics

use crate::core::analytics::{AnalyticsSummary, CrossChainSnapshot};
use crate::core::registry::ChainRegistry;
use crate::shared::error::AdminError;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

pub const REPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const ORDER_COLUMNS: &[&str] = &[
    "Chain",
    "Order ID",
    "Request ID",
    "Status",
    "Token",
    "Amount",
    "Amount (USD)",
    "User",
    "Tx Hash",
    "Explorer",
    "Created At",
];

const CHAIN_COLUMNS: &[&str] = &[
    "Chain",
    "Chain ID",
    "Orders",
    "Successful",
    "Failed",
    "Pending",
    "Volume (USD)",
    "Unpriced",
];

const DAILY_COLUMNS: &[&str] = &["Date", "Orders", "Volume (USD)"];

pub struct ReportBuilder<'a> {
    registry: &'a ChainRegistry,
    summary: &'a AnalyticsSummary,
    snapshot: &'a CrossChainSnapshot,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(
        registry: &'a ChainRegistry,
        summary: &'a AnalyticsSummary,
        snapshot: &'a CrossChainSnapshot,
    ) -> Self {
        Self { registry, summary, snapshot }
    }

    /// `paycrypt-orders-<range>-<yyyymmdd>.xlsx`
    pub fn file_name(&self) -> String {
        format!(
            "paycrypt-orders-{}-{}.xlsx",
            self.summary.range.as_query(),
            self.summary.generated_at.format("%Y%m%d")
        )
    }

    pub fn to_buffer(&self) -> Result<Vec<u8>, AdminError> {
        Ok(self.workbook()?.save_to_buffer()?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AdminError> {
        self.workbook()?.save(path.as_ref())?;
        log::info!("Report written to {}", path.as_ref().display());
        Ok(())
    }

    fn workbook(&self) -> Result<Workbook, AdminError> {
        let header = Format::new().set_bold();
        let mut workbook = Workbook::new();

        self.summary_sheet(workbook.add_worksheet(), &header)?;
        self.orders_sheet(workbook.add_worksheet(), &header)?;
        self.chains_sheet(workbook.add_worksheet(), &header)?;
        self.daily_sheet(workbook.add_worksheet(), &header)?;

        Ok(workbook)
    }

    fn header_row(sheet: &mut Worksheet, columns: &[&str], format: &Format) -> Result<(), AdminError> {
        for (col, title) in columns.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, format)?;
            sheet.set_column_width(col as u16, 16)?;
        }
        Ok(())
    }

    fn summary_sheet(&self, sheet: &mut Worksheet, header: &Format) -> Result<(), AdminError> {
        let summary = self.summary;
        sheet.set_name("Summary")?;
        sheet.set_column_width(0, 24)?;
        sheet.set_column_width(1, 28)?;
        sheet.write_string_with_format(0, 0, "Metric", header)?;
        sheet.write_string_with_format(0, 1, "Value", header)?;

        let text_rows = [
            ("Range", summary.range.as_query().to_string()),
            ("Generated At", summary.generated_at.to_rfc3339()),
        ];
        let number_rows = [
            ("Total Orders", summary.total_orders as f64),
            ("Successful Orders", summary.successful_orders as f64),
            ("Failed Orders", summary.failed_orders as f64),
            ("Pending Orders", summary.pending_orders as f64),
            ("Success Rate (%)", summary.success_rate),
            ("Total Volume (USD)", summary.total_volume_usd),
            ("Unpriced Orders", summary.unpriced_orders as f64),
        ];

        let mut row = 1;
        for (label, value) in text_rows {
            sheet.write_string(row, 0, label)?;
            sheet.write_string(row, 1, value)?;
            row += 1;
        }
        for (label, value) in number_rows {
            sheet.write_string(row, 0, label)?;
            sheet.write_number(row, 1, value)?;
            row += 1;
        }
        for error in &summary.errors {
            sheet.write_string(row, 0, format!("Unavailable: {}", self.registry.get(error.chain).display_name))?;
            sheet.write_string(row, 1, error.message.as_str())?;
            row += 1;
        }
        Ok(())
    }

    fn orders_sheet(&self, sheet: &mut Worksheet, header: &Format) -> Result<(), AdminError> {
        sheet.set_name("Orders")?;
        Self::header_row(sheet, ORDER_COLUMNS, header)?;

        let mut row = 1;
        for chain in &self.snapshot.chains {
            let descriptor = self.registry.get(chain.chain);
            for order in &chain.orders {
                let text = |value: &Option<String>| value.clone().unwrap_or_default();
                sheet.write_string(row, 0, descriptor.display_name.as_str())?;
                sheet.write_string(row, 1, text(&order.order_id))?;
                sheet.write_string(row, 2, text(&order.request_id))?;
                sheet.write_string(row, 3, order.status.as_str())?;
                sheet.write_string(row, 4, text(&order.token_symbol))?;
                sheet.write_number(row, 5, order.amount)?;
                if let Some(usd) = order.amount_usd {
                    sheet.write_number(row, 6, usd)?;
                }
                sheet.write_string(row, 7, text(&order.user))?;
                sheet.write_string(row, 8, text(&order.tx_hash))?;
                if let Some(hash) = &order.tx_hash {
                    sheet.write_string(row, 9, descriptor.tx_url(hash))?;
                }
                sheet.write_string(row, 10, order.created_at.to_rfc3339())?;
                row += 1;
            }
        }
        Ok(())
    }

    fn chains_sheet(&self, sheet: &mut Worksheet, header: &Format) -> Result<(), AdminError> {
        sheet.set_name("By Chain")?;
        Self::header_row(sheet, CHAIN_COLUMNS, header)?;

        for (index, chain) in self.summary.chains.iter().enumerate() {
            let row = index as u32 + 1;
            sheet.write_string(row, 0, chain.display_name.as_str())?;
            sheet.write_number(row, 1, chain.chain_id as f64)?;
            sheet.write_number(row, 2, chain.total_orders as f64)?;
            sheet.write_number(row, 3, chain.successful_orders as f64)?;
            sheet.write_number(row, 4, chain.failed_orders as f64)?;
            sheet.write_number(row, 5, chain.pending_orders as f64)?;
            sheet.write_number(row, 6, chain.volume_usd)?;
            sheet.write_number(row, 7, chain.unpriced_orders as f64)?;
        }
        Ok(())
    }

    fn daily_sheet(&self, sheet: &mut Worksheet, header: &Format) -> Result<(), AdminError> {
        sheet.set_name("Daily Volume")?;
        Self::header_row(sheet, DAILY_COLUMNS, header)?;

        for (index, day) in self.summary.daily.iter().enumerate() {
            let row = index as u32 + 1;
            sheet.write_string(row, 0, day.date.format("%Y-%m-%d").to_string())?;
            sheet.write_number(row, 1, day.orders as f64)?;
            sheet.write_number(row, 2, day.volume_usd)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::{aggregate, ChainError, ChainOrders, CurrencyConverter};
    use crate::domain::entities::{Order, OrderStatus};
    use crate::shared::types::{ChainKey, TimeRange};
    use chrono::Utc;
    use tempfile::TempDir;

    fn fixture() -> (ChainRegistry, AnalyticsSummary, CrossChainSnapshot) {
        let registry = ChainRegistry::with_defaults().unwrap();
        let orders = vec![Order {
            id: "1".to_string(),
            order_id: Some(format!("0x{}", "11".repeat(32))),
            request_id: Some("req-1".to_string()),
            user: Some("0x1111111111111111111111111111111111111111".to_string()),
            token: None,
            token_symbol: Some("USDC".to_string()),
            amount: 42.0,
            amount_usd: Some(42.0),
            status: OrderStatus::Successful,
            chain_id: Some(8453),
            tx_hash: Some(format!("0x{}", "ab".repeat(32))),
            created_at: Utc::now(),
        }];
        let snapshot = CrossChainSnapshot {
            range: TimeRange::Week,
            chains: vec![ChainOrders { chain: ChainKey::Base, orders: orders.clone() }],
            errors: vec![ChainError { chain: ChainKey::Lisk, message: "timeout".to_string() }],
        };
        let volume = aggregate(registry.get(ChainKey::Base), &orders, &CurrencyConverter::new());
        let summary = AnalyticsSummary::from_chains(TimeRange::Week, vec![volume], snapshot.errors.clone());
        (registry, summary, snapshot)
    }

    #[test]
    fn test_report_is_an_xlsx_archive() {
        let (registry, summary, snapshot) = fixture();
        let builder = ReportBuilder::new(&registry, &summary, &snapshot);
        let bytes = builder.to_buffer().unwrap();
        // xlsx files are zip archives.
        assert_eq!(&bytes[..2], b"PK");
        assert!(builder.file_name().starts_with("paycrypt-orders-7d-"));
    }

    #[test]
    fn test_report_saves_to_path() {
        let (registry, summary, snapshot) = fixture();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.xlsx");
        ReportBuilder::new(&registry, &summary, &snapshot).save(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
