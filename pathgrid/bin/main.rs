use std::path::Path;

use anyhow::{bail, Context};
use log::info;
use pathgrid::{Grid, GridConfig, PathFinderState, SearchEvent};

/// Usage: pathgrid [LAYOUT] [--json]
///
/// LAYOUT is a text picture of the grid or, when it ends in `.json`, a grid
/// configuration. Without it the default 20x50 board is searched.
fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let mut layout = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            flag if flag.starts_with('-') => bail!("unknown flag: {}", flag),
            path if layout.is_none() => layout = Some(path.to_owned()),
            extra => bail!("unexpected argument: {}", extra),
        }
    }

    let grid = match layout {
        Some(path) => load_grid(Path::new(&path))?,
        None => GridConfig::default().build()?,
    };
    info!(
        "searching {}x{} grid from {} to {}",
        grid.rows(),
        grid.columns(),
        grid.start(),
        grid.finish()
    );

    let outcome = grid.search();

    if json {
        let events: Vec<SearchEvent<_>> = outcome.events().collect();
        println!("{}", serde_json::to_string(&events)?);
        return Ok(());
    }

    println!("{}", grid);
    println!("{}", outcome.scratch);
    println!("settled {} cells", outcome.visited_order.len());
    match &outcome.state {
        PathFinderState::PathFound(result) => {
            let path: Vec<String> = result.path.iter().map(ToString::to_string).collect();
            println!("path of cost {}: {}", result.total_cost, path.join(" "));
        }
        _ => println!("no path found"),
    }

    Ok(())
}

fn load_grid(path: &Path) -> Result<Grid, anyhow::Error> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let grid = if path.extension().is_some_and(|ext| ext == "json") {
        GridConfig::from_json(&contents)
            .with_context(|| format!("invalid grid configuration in {}", path.display()))?
            .build()?
    } else {
        contents
            .parse::<Grid>()
            .with_context(|| format!("invalid layout in {}", path.display()))?
    };

    Ok(grid)
}
