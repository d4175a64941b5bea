use super::ui;
use crate::core::{FundKind, InvestmentService};
use anyhow::Result;
use comfy_table::Cell;

/// Renders the catalog with a fresh quote for every fund.
pub fn render(service: &InvestmentService) -> Result<String> {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Fund"),
        ui::header_cell("Kind"),
        ui::header_cell("Risk"),
        ui::header_cell("Est. Return"),
        ui::header_cell("Base"),
        ui::header_cell("Quote"),
        ui::header_cell("Change"),
    ]);

    for fund in service.list_funds() {
        let quote = service.quote(&fund.id)?;
        let base = match fund.kind {
            FundKind::Investment => fund.base_price,
            FundKind::Donation => None,
        };
        let change = match base {
            Some(base) => ui::change_cell((quote.price / base - 1.0) * 100.0),
            None => Cell::new(""),
        };

        table.add_row(vec![
            Cell::new(&fund.id),
            Cell::new(&fund.name),
            Cell::new(fund.kind.to_string()),
            Cell::new(fund.risk_level.to_string()),
            Cell::new(&fund.estimated_annual_return),
            ui::format_optional_cell(base, |b| format!("{b:.4}")),
            ui::number_cell(format!("{:.4}", quote.price)),
            change,
        ]);
    }

    Ok(format!(
        "{}\n\n{}",
        ui::style_text("Funds", ui::StyleType::Title),
        table
    ))
}

pub fn run(service: &InvestmentService) -> Result<()> {
    println!("{}", render(service)?);
    Ok(())
}
