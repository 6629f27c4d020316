//! `httpdata schema` – print the data source schema.

use anyhow::Result;
use httpdata_core::datasource;

pub fn run_schema() -> Result<()> {
    let schema = datasource::schema();
    schema.validate()?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
