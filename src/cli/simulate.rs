use super::ui;
use crate::core::{DepositRequest, InvestmentService, PortfolioReport};
use anyhow::{Context, Result, anyhow};
use comfy_table::Cell;

/// Parses a `FUND=AMOUNT` command-line argument.
pub fn parse_deposit(arg: &str) -> Result<(String, f64)> {
    let (fund_id, amount) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FUND=AMOUNT, got '{arg}'"))?;
    let amount = amount
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid amount in '{arg}'"))?;
    Ok((fund_id.trim().to_string(), amount))
}

impl PortfolioReport {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Fund"),
            ui::header_cell("Kind"),
            ui::header_cell("Units"),
            ui::header_cell("Value"),
        ]);

        for line in &self.investments {
            table.add_row(vec![
                Cell::new(&line.name),
                Cell::new("Investment"),
                ui::number_cell(format!("{:.6}", line.units)),
                ui::number_cell(format!("{:.2}", line.amount)),
            ]);
        }
        for line in &self.donations {
            table.add_row(vec![
                Cell::new(&line.name),
                Cell::new("Donation"),
                ui::format_optional_cell(None::<f64>, |u| format!("{u:.6}")),
                ui::number_cell(format!("{:.2}", line.amount)),
            ]);
        }

        let mut output = format!(
            "Portfolio: {}\n\n",
            ui::style_text(&self.user_id, ui::StyleType::Title)
        );

        if self.investments.is_empty() && self.donations.is_empty() {
            output.push_str(&ui::style_text("No holdings", ui::StyleType::Subtle));
        } else {
            output.push_str(&table.to_string());
        }

        output.push_str(&format!(
            "\n\n{} {:.2}\n{} {:.2}\n{} {}",
            ui::style_text("Invested:", ui::StyleType::TotalLabel),
            self.total_invested,
            ui::style_text("Donated:", ui::StyleType::TotalLabel),
            self.total_donated,
            ui::style_text("Total Value:", ui::StyleType::TotalLabel),
            ui::style_text(&format!("{:.2}", self.total), ui::StyleType::TotalValue),
        ));

        output
    }
}

/// Applies `deposits` for `user_id` in order and returns the resulting
/// report. Stops at the first rejected deposit.
pub async fn simulate(
    service: &InvestmentService,
    user_id: &str,
    deposits: &[(String, f64)],
) -> Result<PortfolioReport> {
    for (fund_id, amount) in deposits {
        let receipt = service
            .deposit(&DepositRequest::new(user_id, fund_id, *amount))
            .await
            .with_context(|| format!("Deposit of {amount} into '{fund_id}' rejected"))?;
        println!("{}", ui::style_text(&receipt.message, ui::StyleType::Subtle));
    }
    Ok(service.portfolio(user_id).await)
}

pub async fn run(
    service: &InvestmentService,
    user_id: &str,
    deposits: &[(String, f64)],
) -> Result<()> {
    match simulate(service, user_id, deposits).await {
        Ok(report) => {
            ui::print_separator();
            println!("{}", report.display_as_table());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&format!("{e:#}"), ui::StyleType::Error));
            Err(e)
        }
    }
}
