//! condsql: compile condition trees to SQL from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Compile a bare condition
//! condsql --schema schema.json where '{"age": [">=", 18]}' --table users
//!
//! # Full SELECT with an inferred join
//! condsql select posts --joins '{"users": ["name"]}' --where '{"name": "ada"}'
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use condsql::config::Config;
use condsql::prelude::*;
use serde_json::Value as Json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "condsql")]
#[command(version)]
#[command(about = "Compile nested where-conditions and joins into SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    condsql where '{\"OR\": {\"a\": 1, \"b\": 2}}' --table t
    condsql select posts --joins '[\"users\"]' --limit 10
    condsql update users '{\"id\": 7}' '{\"verified\": 1}'")]
struct Cli {
    /// Schema file (.json or .toml)
    #[arg(short, long, env = "CONDSQL_SCHEMA")]
    schema: Option<PathBuf>,

    /// Config file (defaults to ./condsql.toml)
    #[arg(short, long, env = "CONDSQL_CONFIG")]
    config: Option<PathBuf>,

    /// Skip value validation
    #[arg(long)]
    no_validate: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a bare condition
    Where {
        /// Condition JSON
        condition: String,
        #[arg(short, long)]
        table: Option<String>,
        #[arg(short, long)]
        alias: Option<String>,
        /// Join JSON the condition may refer to
        #[arg(short, long)]
        joins: Option<String>,
        /// Compile as an assignment list (`a = 1 , b = 2`)
        #[arg(long)]
        set: bool,
    },
    /// Build a SELECT statement
    Select {
        table: String,
        #[arg(short, long)]
        alias: Option<String>,
        /// Origin columns, comma separated
        #[arg(short, long, value_delimiter = ',')]
        fields: Vec<String>,
        #[arg(short, long)]
        joins: Option<String>,
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,
        /// Sort column; prefix with '-' for descending
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        order_by: Vec<String>,
        #[arg(short, long)]
        limit: Option<u64>,
        #[arg(long)]
        offset: Option<u64>,
    },
    /// Build an INSERT (or REPLACE) statement
    Insert {
        table: String,
        data: String,
        #[arg(long)]
        replace: bool,
    },
    /// Build an UPDATE statement
    Update {
        table: String,
        filter: String,
        data: String,
    },
    /// Build a DELETE statement
    Delete { table: String, filter: String },
    /// List the tables of the loaded schema
    Tables,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_json(label: &str, input: &str) -> anyhow::Result<Json> {
    serde_json::from_str(input).with_context(|| format!("invalid {} JSON", label))
}

fn parse_opt_json(label: &str, input: Option<&String>) -> anyhow::Result<Json> {
    input.map_or(Ok(Json::Null), |s| parse_json(label, s))
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let schema_path = cli.schema.clone().or(config.schema.clone());
    let schema = match &schema_path {
        Some(path) => Schema::from_file(path)
            .with_context(|| format!("loading schema {}", path.display()))?,
        None => Schema::new(),
    };
    let validate = config.validate && !cli.no_validate;
    let compiler = Compiler::new(&schema, config.quoting.quoter()).with_validation(validate);

    if cli.verbose {
        eprintln!(
            "{} {} table(s), validation {}",
            "Schema:".dimmed(),
            schema.tables.len(),
            if validate { "on".green() } else { "off".yellow() }
        );
    }

    let sql = match &cli.command {
        Commands::Where {
            condition,
            table,
            alias,
            joins,
            set,
        } => {
            let input = parse_json("condition", condition)?;
            let raw_joins = parse_opt_json("joins", joins.as_ref())?;
            let normalized = match table {
                Some(t) => compiler.normalize_joins(t, alias.as_deref(), &raw_joins)?,
                None => Vec::new(),
            };
            let mut opts = CompileOptions {
                table: table.as_deref(),
                ..CompileOptions::default()
            }
            .alias(alias.as_deref())
            .joins(&normalized)
            .validate(validate);
            if *set {
                opts = opts.glue(Glue::Comma).for_select(false);
            }
            compiler.compile_condition(&input, &opts)?
        }
        Commands::Select {
            table,
            alias,
            fields,
            joins,
            filter,
            order_by,
            limit,
            offset,
        } => {
            let mut query = SelectQuery::new(table)
                .joins(parse_opt_json("joins", joins.as_ref())?)
                .filter(parse_opt_json("where", filter.as_ref())?);
            query.alias = alias.clone();
            query.fields = fields.clone();
            for col in order_by {
                query = match col.strip_prefix('-') {
                    Some(c) => query.order_by(c, SortOrder::Desc),
                    None => query.order_by(col, SortOrder::Asc),
                };
            }
            query.limit = *limit;
            query.offset = *offset;
            compiler.select(&query)?
        }
        Commands::Insert {
            table,
            data,
            replace,
        } => {
            let data = parse_json("data", data)?;
            if *replace {
                compiler.replace(table, &data)?
            } else {
                compiler.insert(table, &data)?
            }
        }
        Commands::Update {
            table,
            filter,
            data,
        } => {
            let filter = parse_json("filter", filter)?;
            let data = parse_json("data", data)?;
            match compiler.update(table, &filter, &data)? {
                Some(sql) => sql,
                None => {
                    println!("{}", "(nothing to update)".dimmed());
                    return Ok(());
                }
            }
        }
        Commands::Delete { table, filter } => {
            let filter = parse_json("filter", filter)?;
            compiler.delete(table, &filter)?
        }
        Commands::Tables => {
            show_tables(&schema);
            return Ok(());
        }
    };

    println!("{}", "Generated SQL:".green().bold());
    println!("{}", sql.white());
    Ok(())
}

fn show_tables(schema: &Schema) {
    if schema.tables.is_empty() {
        println!("{}", "(no schema loaded)".dimmed());
        return;
    }
    for table in &schema.tables {
        println!("{}", table.name.cyan().bold());
        for col in &table.columns {
            let length = col.length.map(|l| format!("({})", l)).unwrap_or_default();
            let null = if col.nullable { " null" } else { "" };
            let fks: Vec<String> = col
                .foreign_keys
                .iter()
                .map(|fk| format!("-> {}.{}", fk.table, fk.column))
                .collect();
            println!(
                "  {:20} {}{}{} {}",
                col.name.white(),
                col.typ.to_string().yellow(),
                length,
                null.dimmed(),
                fks.join(" ").dimmed()
            );
        }
    }
}
