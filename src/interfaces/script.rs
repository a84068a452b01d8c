//! Replays session commands against the engine and turns each result, or
//! failure, into an [`Outcome`] for the user.

use crate::application::engine::{SelectionUpdate, VendingMachine};
use crate::error::Result;
use crate::interfaces::csv::command_reader::Command;
use crate::interfaces::json::outcome_writer::{Outcome, SelectionChange};
use tracing::warn;

pub async fn execute(machine: &VendingMachine, command: Command) -> Outcome {
    match apply(machine, command).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(kind = %e.kind(), reason = %e, "command failed");
            Outcome::from(&e)
        }
    }
}

async fn apply(machine: &VendingMachine, command: Command) -> Result<Outcome> {
    let outcome = match command {
        Command::Insert(value) => Outcome::Balance {
            current_balance: machine.insert_coin(value).await?,
        },
        Command::Products => Outcome::Products {
            products: machine.list_available_products().await?,
        },
        Command::Select(id) => {
            let update = machine.select_product(id).await?;
            let message = format!("Product '{}' added to selection.", update.product.name);
            Outcome::Selected(selection_change(update, message))
        }
        Command::Deselect(id) => match machine.deselect_product(id).await {
            Some(update) => {
                let message = format!(
                    "One instance of product '{}' removed from selection.",
                    update.product.name
                );
                Outcome::Deselected(selection_change(update, message))
            }
            None => Outcome::NotInSelection {
                product_id: id,
                message: format!("Product with ID {id} not found in current selection."),
            },
        },
        Command::Dispense => Outcome::Dispensed(machine.dispense().await?),
        Command::Cancel => Outcome::Refunded(machine.cancel_transaction().await),
        Command::State => Outcome::State(machine.state().await),
        Command::Add { name, price } => Outcome::ProductAdded {
            product: machine.add_product(&name, price).await?,
        },
    };
    Ok(outcome)
}

fn selection_change(update: SelectionUpdate, message: String) -> SelectionChange {
    let quantity_in_selection = update.quantity_in_selection();
    SelectionChange {
        message,
        product: update.product,
        quantity_in_selection,
        current_selected_items_cost: update.state.total_selected_cost,
        current_balance: update.state.balance,
    }
}
