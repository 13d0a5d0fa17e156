//! Terminal front end for the stockroom data access layer.
//!
//! Wires configuration and the fallback store, then dispatches one of the
//! `list` / `add` / `update` / `remove` / `health` subcommands. Argument
//! parsing is deliberately hand rolled; the surface is five subcommands and a
//! handful of flags.
use anyhow::Result;
use std::sync::OnceLock;
use stockroom_client::{ClientConfig, FallbackStore, ProductStore};
use stockroom_model::{Product, ProductInput, ProductPatch};
use stockroom_view::{ProductQuery, SortDirection, SortKey};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: stockctl <command>

commands:
  list   [--search <text>] [--sort name|price|stock] [--desc]
  add    --name <name> --sku <sku> --price <price> --stock <count> [--category <category>]
  update <id> [--name <name>] [--sku <sku>] [--price <price>] [--stock <count>] [--category <category>]
  remove <id>
  health";

static TRACING_INIT: OnceLock<()> = OnceLock::new();

// Logging setup in the shape of the service entry points: env-filtered fmt
// subscriber, idempotent so tests can call it repeatedly.
fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

#[derive(Debug, PartialEq)]
enum Command {
    List(ProductQuery),
    Add(ProductInput),
    Update { id: String, patch: ProductPatch },
    Remove { id: String },
    Health,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut args = args.iter();
    let command = args.next().ok_or_else(|| "missing command".to_string())?;
    match command.as_str() {
        "list" => {
            let mut query = ProductQuery::default();
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--search" => query.search = take_value(flag, &mut args)?.clone(),
                    "--sort" => query.sort = take_value(flag, &mut args)?.parse::<SortKey>()?,
                    "--desc" => query.direction = SortDirection::Descending,
                    other => return Err(format!("unknown flag for list: {other}")),
                }
            }
            Ok(Command::List(query))
        }
        "add" => {
            let mut name = None;
            let mut sku = None;
            let mut price = None;
            let mut stock = None;
            let mut category = None;
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--name" => name = Some(take_value(flag, &mut args)?.clone()),
                    "--sku" => sku = Some(take_value(flag, &mut args)?.clone()),
                    "--price" => price = Some(parse_price(take_value(flag, &mut args)?)?),
                    "--stock" => stock = Some(parse_stock(take_value(flag, &mut args)?)?),
                    "--category" => category = Some(take_value(flag, &mut args)?.clone()),
                    other => return Err(format!("unknown flag for add: {other}")),
                }
            }
            Ok(Command::Add(ProductInput {
                name: name.ok_or("add requires --name")?,
                sku: sku.ok_or("add requires --sku")?,
                price: price.ok_or("add requires --price")?,
                stock: stock.ok_or("add requires --stock")?,
                category,
            }))
        }
        "update" => {
            let id = args
                .next()
                .ok_or_else(|| "update requires an id".to_string())?
                .clone();
            let mut patch = ProductPatch::default();
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--name" => patch.name = Some(take_value(flag, &mut args)?.clone()),
                    "--sku" => patch.sku = Some(take_value(flag, &mut args)?.clone()),
                    "--price" => patch.price = Some(parse_price(take_value(flag, &mut args)?)?),
                    "--stock" => patch.stock = Some(parse_stock(take_value(flag, &mut args)?)?),
                    "--category" => patch.category = Some(take_value(flag, &mut args)?.clone()),
                    other => return Err(format!("unknown flag for update: {other}")),
                }
            }
            if patch.is_empty() {
                return Err("update requires at least one field".to_string());
            }
            Ok(Command::Update { id, patch })
        }
        "remove" => {
            let id = args
                .next()
                .ok_or_else(|| "remove requires an id".to_string())?
                .clone();
            if let Some(extra) = args.next() {
                return Err(format!("unexpected argument: {extra}"));
            }
            Ok(Command::Remove { id })
        }
        "health" => Ok(Command::Health),
        other => Err(format!("unknown command: {other}")),
    }
}

fn take_value<'a>(
    flag: &str,
    args: &mut std::slice::Iter<'a, String>,
) -> Result<&'a String, String> {
    args.next().ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_price(value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|price| *price >= 0.0)
        .ok_or_else(|| format!("invalid price: {value}"))
}

fn parse_stock(value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("invalid stock count: {value}"))
}

fn print_products(products: &[Product]) {
    println!(
        "{:<36}  {:<24}  {:<10}  {:>10}  {:>6}  {}",
        "ID", "NAME", "SKU", "PRICE", "STOCK", "CATEGORY"
    );
    for product in products {
        println!(
            "{:<36}  {:<24}  {:<10}  {:>10.2}  {:>6}  {}",
            product.id,
            product.name,
            product.sku,
            product.price,
            product.stock,
            product.category.as_deref().unwrap_or("-")
        );
    }
}

async fn run(command: Command, store: &FallbackStore) -> Result<()> {
    match command {
        Command::List(query) => {
            let (products, backend) = store.list_products_traced().await?;
            let rows = query.apply(&products);
            print_products(&rows);
            println!("{} product(s) via {backend} store", rows.len());
        }
        Command::Add(input) => {
            let product = store.create_product(input).await?;
            println!("created {}", product.id);
        }
        Command::Update { id, patch } => {
            let product = store.update_product(&id, patch).await?;
            println!("updated {}", product.id);
        }
        Command::Remove { id } => {
            let confirmed = store.delete_product(&id).await?;
            println!("removed {confirmed}");
        }
        Command::Health => {
            let report = store.health().await?;
            println!("status: {}", report.status);
            println!("db:     {}", report.db);
            println!("uptime: {:.0}s", report.uptime);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    let config = ClientConfig::from_env_or_yaml()?;
    tracing::debug!(
        api_base = %config.api_base,
        data_dir = %config.data_dir.display(),
        "stockctl configured"
    );
    let store = FallbackStore::new(&config)?;
    run(command, &store).await
}
