// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! cqlcodec - inspect CQL types and their binary encodings
//!
//! ```text
//! cqlcodec describe "map<text, frozen<list<int>>>"
//! cqlcodec random "set<int>" -n 3 --min 2
//! cqlcodec decode "frozen<address>" 0x0000000178 --registry udts.json -k shop
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use cqlcodec::json::{hex, to_json_typed};
use cqlcodec::{parse_type, type_to_bytes, Codec, CodecConfig, CqlType, RandomValues, SchemaRegistry};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cqlcodec")]
#[command(about = "Inspect CQL type descriptors and their binary encodings")]
#[command(version)]
struct Cli {
    /// JSON file of UDT definitions used to resolve type names
    #[arg(long, global = true, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Generator settings (JSON or YAML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keyspace for unqualified UDT names
    #[arg(short, long, global = true, default_value = "ks")]
    keyspace: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random values of a type and print them with their encoding
    Random {
        /// CQL type name, e.g. "list<frozen<tuple<int, text>>>"
        #[arg(value_name = "TYPE")]
        cql_type: String,

        /// Number of values
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Minimum collection size (overrides the config file)
        #[arg(long)]
        min: Option<usize>,

        /// Fixed seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Decode a hex-encoded value and print it as JSON
    Decode {
        #[arg(value_name = "TYPE")]
        cql_type: String,

        /// Encoded bytes, optionally prefixed with 0x
        #[arg(value_name = "HEX")]
        bytes: String,

        /// Decode with the nested (frozen) layout
        #[arg(long)]
        nested: bool,
    },

    /// Show name, cell layout, nested UDTs and DDL for a type
    Describe {
        #[arg(value_name = "TYPE")]
        cql_type: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let registry = load_registry(cli.registry.as_deref())?;

    match cli.command {
        Commands::Random {
            cql_type,
            count,
            min,
            seed,
        } => {
            let ty = resolve(&cql_type, &cli.keyspace, &registry)?;
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(min) = min {
                config.min_collection_size = min;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            cmd_random(&ty, &registry, config, count)?;
        }
        Commands::Decode {
            cql_type,
            bytes,
            nested,
        } => {
            let ty = resolve(&cql_type, &cli.keyspace, &registry)?;
            cmd_decode(&ty, &registry, &bytes, nested)?;
        }
        Commands::Describe { cql_type } => {
            let ty = resolve(&cql_type, &cli.keyspace, &registry)?;
            cmd_describe(&ty)?;
        }
    }

    Ok(())
}

fn load_registry(path: Option<&Path>) -> anyhow::Result<SchemaRegistry> {
    match path {
        Some(path) => {
            let registry = SchemaRegistry::load(path)
                .with_context(|| format!("loading UDT definitions from {}", path.display()))?;
            tracing::info!("loaded {} UDT definitions from {}", registry.len(), path.display());
            Ok(registry)
        }
        None => Ok(SchemaRegistry::new()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CodecConfig> {
    let config = match path {
        Some(path) => CodecConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CodecConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn resolve(name: &str, keyspace: &str, registry: &SchemaRegistry) -> anyhow::Result<CqlType> {
    let ty = parse_type(name, keyspace, registry).with_context(|| format!("resolving type '{}'", name))?;
    tracing::debug!("resolved '{}' to {}", name, ty);
    Ok(ty)
}

fn cmd_random(ty: &CqlType, registry: &SchemaRegistry, config: CodecConfig, count: usize) -> anyhow::Result<()> {
    let codec = Codec::new(registry);
    let mut values = RandomValues::new(config);
    for _ in 0..count {
        let value = values.value(ty);
        let bytes = codec.serialize(ty, &value)?;
        println!("{}", to_json_typed(ty, &value));
        println!("{}", hex(&bytes));
    }
    Ok(())
}

fn cmd_decode(ty: &CqlType, registry: &SchemaRegistry, input: &str, nested: bool) -> anyhow::Result<()> {
    let bytes = parse_hex(input)?;
    let codec = Codec::new(registry);
    let value = codec
        .deserialize_with(ty, &bytes, nested)
        .with_context(|| format!("decoding {} bytes as {}", bytes.len(), ty))?;
    println!("{}", serde_json::to_string_pretty(&to_json_typed(ty, &value))?);
    Ok(())
}

fn cmd_describe(ty: &CqlType) -> anyhow::Result<()> {
    println!("type:        {}", ty.cql_name());
    println!("multi-cell:  {}", ty.is_multi_cell());
    println!("layout:      {:?}", ty.cell_layout(false));
    println!("descriptor:  {}", hex(&type_to_bytes(ty)?));

    let udts = ty.udts();
    if !udts.is_empty() {
        println!();
        println!("UDTs ({}):", udts.len());
        for udt in &udts {
            println!("  {}", udt.create_stmt());
        }
    }
    Ok(())
}

fn parse_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let digits: String = input
        .trim()
        .trim_start_matches("0x")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        bail!("invalid hex digit '{}' in '{}'", bad, input);
    }
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits in '{}'", input);
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .with_context(|| format!("invalid hex byte '{}'", &digits[i..i + 2]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x00ff10").expect("hex"), vec![0x00, 0xff, 0x10]);
        assert_eq!(parse_hex("de ad").expect("hex"), vec![0xde, 0xad]);
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["cqlcodec", "random", "set<int>", "-n", "2", "--min", "3"]);
        assert!(matches!(
            cli.command,
            Commands::Random {
                count: 2,
                min: Some(3),
                ..
            }
        ));
        assert_eq!(cli.keyspace, "ks");
    }
}
