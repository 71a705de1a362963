//! Arinola Bank interactive terminal
//!
//! Thin presentation layer: collects input, calls the engine, renders
//! results. No business logic lives here.

use anyhow::Result;
use bank_core::{BankEngine, Config, Role, Session, TellerOperation};
use clap::Parser;
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::path::PathBuf;

/// Interactive banking terminal
#[derive(Debug, Parser)]
#[command(name = "arinola-bank", version, about = "Arinola Bank interactive terminal")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the snapshot file path
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing; keep the terminal quiet unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(path) = args.snapshot {
        config.snapshot_path = path;
    }

    let engine = BankEngine::open(config)?;
    println!("\nWelcome to Arinola Bank Terminal!");

    loop {
        println!("\n----------------------");
        println!(" 1. Register");
        println!(" 2. Login");
        println!(" 3. Exit");
        println!("----------------------");

        match prompt("Select an option (1-3): ")?.as_str() {
            "1" => register(&engine)?,
            "2" => login(&engine)?,
            "3" => {
                println!("Exiting... Have a great day!");
                return Ok(());
            }
            _ => println!("Invalid option. Try again."),
        }
    }
}

fn prompt(text: &str) -> Result<String> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_amount(text: &str) -> Result<Option<Decimal>> {
    let raw = prompt(text)?;
    match raw.parse::<Decimal>() {
        Ok(amount) if amount > Decimal::ZERO => Ok(Some(amount)),
        Ok(_) => {
            println!("Amount must be greater than zero.");
            Ok(None)
        }
        Err(_) => {
            println!("Invalid amount entered.");
            Ok(None)
        }
    }
}

fn register(engine: &BankEngine) -> Result<()> {
    println!("\n--- User Registration ---");
    let username = prompt("Enter a username: ")?;
    let password = prompt("Enter a password: ")?;
    let role_input = prompt("Enter role (client/employee/admin): ")?;

    let role = match Role::parse(&role_input) {
        Some(role) => role,
        None => {
            println!("Invalid role. Defaulting to 'client'.");
            Role::Client
        }
    };

    match engine.register(&username, &password, role) {
        Ok(()) => println!("User '{username}' registered successfully!"),
        Err(e) => println!("Registration failed: {e}"),
    }
    Ok(())
}

fn login(engine: &BankEngine) -> Result<()> {
    println!("\n--- User Login ---");
    let username = prompt("Enter your username: ")?;
    let password = prompt("Enter your password: ")?;

    match engine.login(&username, &password) {
        Ok(session) => {
            println!("Welcome back, {username}!");
            dashboard(engine, session)
        }
        Err(e) => {
            println!("Login failed: {e}");
            Ok(())
        }
    }
}

fn dashboard(engine: &BankEngine, session: Session) -> Result<()> {
    let result = match session.role() {
        Role::Client => client_menu(engine, &session),
        Role::Employee => employee_menu(engine, &session),
        Role::Admin => admin_menu(engine, &session),
    };
    engine.logout(session);
    result
}

fn client_menu(engine: &BankEngine, session: &Session) -> Result<()> {
    loop {
        println!("\n=== Client Dashboard ===");
        println!("1. View Balance");
        println!("2. Transfer Money");
        println!("3. View Transactions");
        println!("4. Logout");

        match prompt("Choose an option: ")?.as_str() {
            "1" => match engine.balance(Some(session)) {
                Ok(balance) => println!("Current Balance: ${balance:.2}"),
                Err(e) => println!("{e}"),
            },
            "2" => transfer(engine, session)?,
            "3" => view_transactions(engine, session)?,
            "4" => {
                println!("Logging out...");
                return Ok(());
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn transfer(engine: &BankEngine, session: &Session) -> Result<()> {
    let recipient = prompt("Enter recipient's username: ")?;
    let Some(amount) = prompt_amount("Enter amount to transfer: ")? else {
        return Ok(());
    };
    let narrative = prompt("Enter a description: ")?;

    match engine.transfer(Some(session), &recipient, amount, &narrative) {
        Ok(_) => println!("Transfer of ${amount:.2} to '{recipient}' successful!"),
        Err(e) => println!("Transfer failed: {e}"),
    }
    Ok(())
}

fn view_transactions(engine: &BankEngine, session: &Session) -> Result<()> {
    let transactions = match engine.transactions(Some(session)) {
        Ok(transactions) => transactions,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };
    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!("\nTransaction History:");
    for tx in transactions {
        println!(
            "- {} | {} | ${:.2}",
            tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
            tx.kind.as_str().to_uppercase(),
            tx.amount
        );
        println!("  Description: {}", tx.narrative.plain);
        println!("  ----------------------");
    }
    Ok(())
}

fn employee_menu(engine: &BankEngine, session: &Session) -> Result<()> {
    loop {
        println!("\n=== Employee Dashboard ===");
        println!("1. Process Deposit/Withdrawal");
        println!("2. Logout");

        match prompt("Choose an option: ")?.as_str() {
            "1" => process_transaction(engine, session)?,
            "2" => {
                println!("Logging out...");
                return Ok(());
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn process_transaction(engine: &BankEngine, session: &Session) -> Result<()> {
    let customer = prompt("Enter customer's username: ")?;
    let operation = match TellerOperation::parse(&prompt("Enter type (deposit/withdrawal): ")?) {
        Ok(operation) => operation,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };
    let Some(amount) = prompt_amount("Enter amount: ")? else {
        return Ok(());
    };
    let narrative = prompt("Enter a description: ")?;

    match engine.process_transaction(Some(session), &customer, amount, operation, &narrative) {
        Ok(applied) => {
            println!("{operation} of ${amount:.2} recorded for '{customer}'.");
            println!("New balance: ${:.2}", applied.balance);
        }
        Err(e) => println!("Operation failed: {e}"),
    }
    Ok(())
}

fn admin_menu(engine: &BankEngine, session: &Session) -> Result<()> {
    loop {
        println!("\n=== Admin Dashboard ===");
        println!("1. List Users");
        println!("2. Change User Role");
        println!("3. Logout");

        match prompt("Choose an option: ")?.as_str() {
            "1" => match engine.list_users(Some(session)) {
                Ok(summaries) => {
                    println!("\n{:<20} {:<10} {}", "USERNAME", "ROLE", "ACCOUNT");
                    for summary in summaries {
                        println!(
                            "{:<20} {:<10} {}",
                            summary.username,
                            summary.role,
                            if summary.has_account { "yes" } else { "no" }
                        );
                    }
                }
                Err(e) => println!("{e}"),
            },
            "2" => change_role(engine, session)?,
            "3" => {
                println!("Logging out...");
                return Ok(());
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn change_role(engine: &BankEngine, session: &Session) -> Result<()> {
    let target = prompt("Enter target username: ")?;
    let role_input = prompt("Enter new role (client/employee/admin): ")?;
    let Some(role) = Role::parse(&role_input) else {
        println!("Invalid role: '{role_input}'");
        return Ok(());
    };

    match engine.change_user_role(Some(session), &target, role) {
        Ok(()) => println!("Role of '{target}' changed to '{role}'."),
        Err(e) => println!("Role change failed: {e}"),
    }
    Ok(())
}
