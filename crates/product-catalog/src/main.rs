//! # Product Catalog Console
//!
//! A menu over stdin/stdout for managing the catalog file.
//!
//! 1. Loads `.env` (if present) and reads [`CatalogConfig`] from the environment.
//! 2. Starts the [`CatalogSystem`] and locks its product service.
//! 3. Loops over the menu until `0`, end of input, or Ctrl-C, then shuts down.
//!
//! Ctrl-C while an operation is running cancels that operation only. At a
//! form prompt it abandons the form; at the menu it exits.

use anyhow::Context;
use json_repository::ResponseResult;
use product_catalog::config::CatalogConfig;
use product_catalog::lifecycle::{setup_tracing, CatalogService, CatalogSystem};
use product_catalog::model::{Product, ProductRequest};
use product_catalog::product_service::CancelHandle;
use product_catalog::validators::{parse_decimal, validate_name};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = CatalogConfig::from_env().context("Invalid catalog configuration")?;
    let system = CatalogSystem::start(&config).context("Failed to start catalog")?;
    info!(path = %config.file_path().display(), "Starting product catalog");

    let mut service = system.service().lock_owned().await;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        println!("### MENU OPTIONS ###");
        println!("1. View Product List");
        println!("2. Add Product");
        println!("3. Edit Product");
        println!("4. Delete Product");
        println!("0. Exit Application");

        let Some(option) = prompt(&mut input, "Choose a menu option: ").await? else {
            break;
        };
        match option.as_str() {
            "1" => show_products(&mut service).await,
            "2" => add_product(&mut service, &mut input).await?,
            "3" => edit_product(&mut service, &mut input).await?,
            "4" => delete_product(&mut service, &mut input).await?,
            "0" => break,
            _ => println!("Unknown option."),
        }
    }

    drop(service);
    system.shutdown().await?;
    Ok(())
}

async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    println!("{label}");
    read_line(input, tokio::signal::ctrl_c()).await
}

/// The next trimmed line, or `None` at end of input or once `interrupt` completes.
async fn read_line<R, I>(input: &mut Lines<R>, interrupt: I) -> anyhow::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    I: Future,
{
    tokio::select! {
        line = input.next_line() => {
            let line = line.context("Failed to read input")?;
            Ok(line.map(|l| l.trim().to_string()))
        }
        _ = interrupt => Ok(None),
    }
}

/// Runs `operation`, cancelling it through `handle` if Ctrl-C arrives first.
async fn interruptible<F: Future>(handle: CancelHandle, operation: F) -> F::Output {
    tokio::pin!(operation);
    tokio::select! {
        output = &mut operation => output,
        _ = tokio::signal::ctrl_c() => {
            handle.cancel();
            operation.await
        }
    }
}

fn report<T>(response: &ResponseResult<T>, done: &str) {
    match &response.error {
        None if response.success => println!("{done}"),
        error => println!(
            "Error ({}): {}",
            response.status_code,
            error.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn print_product(product: &Product) {
    println!("Id: {}", product.id);
    println!("Name: {}", product.name);
    match product.price {
        Some(price) => println!("Price: {price} SEK"),
        None => println!("Price: -"),
    }
    println!();
}

async fn show_products(service: &mut CatalogService) {
    let handle = service.cancel_handle();
    let response = interruptible(handle, service.list()).await;
    match (&response.content, response.success) {
        (Some(products), true) => {
            println!("### PRODUCT LIST ###");
            if products.is_empty() {
                println!("No products yet.");
            }
            products.iter().for_each(print_product);
        }
        _ => report(&response, ""),
    }
}

async fn add_product(service: &mut CatalogService, input: &mut Input) -> anyhow::Result<()> {
    println!("### NEW PRODUCT ###");
    let Some(raw_name) = prompt(input, "Product Name: ").await? else {
        return Ok(());
    };
    let name = match validate_name(Some(raw_name.as_str())) {
        Ok(name) => name,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    let mut request = ProductRequest::new(name);
    let Some(raw_price) = prompt(input, "Product Price (SEK, blank for none): ").await? else {
        return Ok(());
    };
    if !raw_price.is_empty() {
        match parse_decimal(Some(raw_price.as_str())) {
            Ok(price) => request = request.with_price(price),
            Err(e) => {
                println!("{e}");
                return Ok(());
            }
        }
    }

    let handle = service.cancel_handle();
    let response = interruptible(handle, service.create(request)).await;
    report(&response, "Product saved.");
    Ok(())
}

async fn edit_product(service: &mut CatalogService, input: &mut Input) -> anyhow::Result<()> {
    let Some(id) = prompt(input, "Product Id: ").await? else {
        return Ok(());
    };
    let listed = service.list().await;
    if !listed.success {
        report(&listed, "");
        return Ok(());
    }
    let Some(mut product) = listed
        .content
        .unwrap_or_default()
        .into_iter()
        .find(|p| p.id == id)
    else {
        println!("Product not found.");
        return Ok(());
    };

    let Some(name) = prompt(input, &format!("Name [{}]: ", product.name)).await? else {
        return Ok(());
    };
    if !name.is_empty() {
        product.name = name;
    }

    let Some(raw_price) = prompt(input, "Price (blank to keep): ").await? else {
        return Ok(());
    };
    if !raw_price.is_empty() {
        match parse_decimal(Some(raw_price.as_str())) {
            Ok(price) => product.price = Some(price),
            Err(e) => {
                println!("{e}");
                return Ok(());
            }
        }
    }

    let handle = service.cancel_handle();
    let response = interruptible(handle, service.update(product)).await;
    report(&response, "Product updated.");
    Ok(())
}

async fn delete_product(service: &mut CatalogService, input: &mut Input) -> anyhow::Result<()> {
    let Some(id) = prompt(input, "Product Id: ").await? else {
        return Ok(());
    };

    let handle = service.cancel_handle();
    let response = interruptible(handle, service.delete(&id)).await;
    match response.content {
        Some(0) => println!("No product with id {id}."),
        _ => report(&response, "Product deleted."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_trims_and_ends_with_input() {
        let mut input = BufReader::new(&b"  2 \n"[..]).lines();

        let first = read_line(&mut input, std::future::pending::<()>()).await.unwrap();
        let second = read_line(&mut input, std::future::pending::<()>()).await.unwrap();

        assert_eq!(first.as_deref(), Some("2"));
        assert_eq!(second, None);
    }

    #[tokio::test]
    async fn test_read_line_stops_when_interrupted() {
        let (_writer, reader) = tokio::io::duplex(64);
        let mut input = BufReader::new(reader).lines();

        let line = read_line(&mut input, std::future::ready(())).await.unwrap();

        assert_eq!(line, None);
    }
}
