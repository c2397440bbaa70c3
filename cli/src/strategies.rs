#![deny(missing_docs)]

//! # Strategies Command
//!
//! Lists the supported strategies per position and shape category. The first
//! entry of each list is the default.

use paramcodec_core::{
    supported_parse_strategies, supported_serialize_strategies, Direction, ParameterPosition,
    SerializationStrategy, ShapeCategory,
};

use crate::error::CliResult;

/// Arguments for the strategies command.
#[derive(clap::Args, Debug, Clone)]
pub struct StrategiesArgs {
    /// Only list this position.
    #[clap(long)]
    pub position: Option<ParameterPosition>,
}

fn line(
    direction: Direction,
    position: ParameterPosition,
    category: ShapeCategory,
    strategies: &[SerializationStrategy],
) -> String {
    let list = strategies
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{position} {direction} {category}: {list}")
}

/// Renders the tables, one line per `(position, direction, category)`.
pub fn run(args: &StrategiesArgs) -> CliResult<String> {
    let positions = match args.position {
        Some(position) => vec![position],
        None => ParameterPosition::ALL.to_vec(),
    };

    let mut lines = Vec::new();
    for position in positions {
        for category in ShapeCategory::ALL {
            lines.push(line(
                Direction::Request,
                position,
                category,
                supported_parse_strategies(position, category),
            ));
        }
        for category in ShapeCategory::ALL {
            if let Some(strategies) = supported_serialize_strategies(position, category) {
                lines.push(line(Direction::Response, position, category, strategies));
            }
        }
    }
    Ok(lines.join("\n"))
}

/// Executes the strategies command.
pub fn execute(args: &StrategiesArgs) -> CliResult<()> {
    println!("{}", run(args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cookie_tables() {
        let out = run(&StrategiesArgs {
            position: Some(ParameterPosition::Cookie),
        })
        .unwrap();
        assert_eq!(
            out,
            "cookie request primitive: form(explode=false), form(explode=true)\n\
             cookie request array: form(explode=false)\n\
             cookie request object: form(explode=false)\n\
             cookie response primitive: form(explode=false), form(explode=true), content(application/json)\n\
             cookie response array: form(explode=false)\n\
             cookie response object: form(explode=false)"
        );
    }

    #[test]
    fn test_paths_have_no_response_side() {
        let out = run(&StrategiesArgs {
            position: Some(ParameterPosition::PathParameter),
        })
        .unwrap();
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().all(|line| line.starts_with("path parameter request")));
    }

    #[test]
    fn test_all_positions() {
        let out = run(&StrategiesArgs { position: None }).unwrap();
        assert_eq!(out.lines().count(), 4 * 3 + 2 * 3);
    }
}
