use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use notated::{
  Catalog, CatalogConfig, Dimensions, Expression, Renderer, StdoutRenderer,
};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(flatten)]
  data: DataArgs,

  #[command(subcommand)]
  command: Commands,
}

/// Shape and seed of the synthetic catalog
#[derive(Args)]
struct DataArgs {
  /// Number of temperature bins
  #[arg(long, global = true, default_value_t = Dimensions::default().bins)]
  bins: usize,

  /// Number of regions
  #[arg(long, global = true, default_value_t = Dimensions::default().regions)]
  regions: usize,

  /// Number of years
  #[arg(long, global = true, default_value_t = Dimensions::default().years)]
  years: usize,

  /// Seed for the random catalog values
  #[arg(long, global = true, default_value_t = CatalogConfig::default().seed)]
  seed: u64,
}

impl DataArgs {
  fn config(&self) -> CatalogConfig {
    CatalogConfig {
      dimensions: Dimensions {
        bins: self.bins,
        regions: self.regions,
        years: self.years,
      },
      seed: self.seed,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Derive temperature-driven mortality and print every equation
  Demo {
    /// Also compute the values and print the result shapes
    #[arg(long)]
    evaluate: bool,
  },
  /// List the catalog entries
  List,
  /// Print the equation of a single catalog entry
  Show {
    /// Catalog entry name, e.g. temperature
    name: String,
  },
  /// Pass backend options to the catalog
  Configure {
    /// Options as key=value; values are parsed as JSON when possible
    options: Vec<String>,
  },
}

fn parse_option(option: &str) -> Result<(String, Value)> {
  let Some((key, value)) = option.split_once('=') else {
    bail!("expected key=value, got {option:?}");
  };
  let value = serde_json::from_str(value)
    .unwrap_or_else(|_| Value::String(value.to_string()));
  Ok((key.to_string(), value))
}

fn demo(catalog: &Catalog, evaluate: bool) -> Result<()> {
  let mut renderer = StdoutRenderer;

  let alpha = catalog.get("alpha")?;
  let gamma1 = catalog.get("gamma1")?;
  let gamma2 = catalog.get("gamma2")?;
  let gamma3 = catalog.get("gamma3")?;
  let days = catalog.get("avgDaysPerBin")?;
  let gdp = catalog.get("gdpPerCapita")?;
  let density = catalog.get("populationDensity")?;
  let temperature = catalog.get("temperature")?;

  let inputs =
    [&alpha, &gamma1, &gamma2, &gamma3, &days, &gdp, &density, &temperature];
  for input in inputs {
    renderer.render_notation(&input.canonical_symbol()?);
  }

  let betahat =
    &alpha + &gamma1 * &days + &gamma2 * gdp.ln() + &gamma3 * density.ln();
  renderer.render_notation(betahat.notation());

  let mut betahat = betahat.force().context("computing betahat")?;
  betahat.set_symbol(r"\hat{\beta}")?;
  betahat.display(&mut renderer)?;
  betahat.set_notation(r"\hat{\beta}")?;

  let mortality = (&betahat * &temperature).sum(Some("bins"));
  renderer.render_notation(mortality.notation());

  if evaluate {
    let mut mortality = mortality.force().context("computing mortality")?;
    mortality.set_symbol("M")?;
    mortality.display(&mut renderer)?;
    print_shape(&mortality)?;
  }
  Ok(())
}

fn print_shape(expression: &Expression) -> Result<()> {
  let Some(value) = expression.payload() else {
    bail!("expression is not realized");
  };
  let mean = value.values().iter().sum::<f64>() / value.len().max(1) as f64;
  println!(
    "axes: {}, shape: {:?}, mean: {mean}",
    expression.axes()?.join(", "),
    value.shape()
  );
  Ok(())
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let mut catalog = Catalog::with_config(&cli.data.config())?;

  match cli.command {
    Commands::Demo { evaluate } => demo(&catalog, evaluate)?,
    Commands::List => {
      for (name, array) in catalog.entries() {
        println!(
          "{name}\t{}\t{}\t{}",
          array.symbol().unwrap_or("-"),
          array.axis_names().join(","),
          array.description().unwrap_or("")
        );
      }
    }
    Commands::Show { name } => {
      let expression = catalog.get(&name)?;
      println!("{}", expression.equation()?);
    }
    Commands::Configure { options } => {
      let options = options
        .iter()
        .map(String::as_str)
        .map(parse_option)
        .collect::<Result<Map<_, _>>>()?;
      catalog.reconfigure(options);
      println!("API configuration updated");
    }
  }
  Ok(())
}
