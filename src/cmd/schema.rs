//! Schema command - print expected input formats

use clap::Args;
use schemars::schema_for;
use taxcomp::core::{AgeBracket, InputField, ProfileInput};

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for one profile
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(ProfileInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", csv_header()),
            SchemaFormat::CsvFields => print_csv_fields(ProfileInput::input_fields()),
        }
        Ok(())
    }
}

fn csv_header() -> String {
    ProfileInput::input_fields()
        .iter()
        .map(|f| f.name)
        .collect::<Vec<_>>()
        .join(",")
}

fn print_csv_fields(fields: &[InputField]) {
    println!("Profile Input Format");
    println!("====================");
    println!();
    for field in fields {
        let req = if field.required { "required" } else { "optional" };
        println!(
            "{:20} {:7} ({:8})  {}",
            field.name,
            field.kind.label(),
            req,
            field.description
        );
    }
    println!();
    let brackets: Vec<_> = AgeBracket::ALL.iter().map(|a| a.as_str()).collect();
    println!("age_bracket is one of: {}", brackets.join(", "));
    println!("Blank amounts count as zero.");
}
