use crate::output::Output;
use cinewheel_config::PathManager;
use color_eyre::Result;
use std::fs;
use std::path::Path;

pub async fn run_clear(
    all: bool,
    cache: bool,
    filters: bool,
    user_data: bool,
    output: &Output,
) -> Result<()> {
    let paths = PathManager::default();

    if all {
        clear_cache(&paths, output)?;
        clear_filters(&paths, output)?;
        clear_user_data(&paths, output)?;
        output.success("All cached data cleared");
        return Ok(());
    }

    let mut cleared_anything = false;

    if cache {
        clear_cache(&paths, output)?;
        cleared_anything = true;
    }

    if filters {
        clear_filters(&paths, output)?;
        cleared_anything = true;
    }

    if user_data {
        clear_user_data(&paths, output)?;
        cleared_anything = true;
    }

    if !cleared_anything {
        output.warn("No clear option specified. Use --cache, --filters, --user-data, or --all");
        output.println("\nExample: cinewheel clear --cache");
    }

    Ok(())
}

fn clear_cache(paths: &PathManager, output: &Output) -> Result<()> {
    remove_if_present(&paths.metadata_cache_file(), "metadata cache", output)?;
    remove_if_present(&paths.genre_cache_file(), "genre cache", output)?;
    Ok(())
}

fn clear_filters(paths: &PathManager, output: &Output) -> Result<()> {
    remove_if_present(&paths.filter_state_file(), "filter state", output)
}

fn clear_user_data(paths: &PathManager, output: &Output) -> Result<()> {
    // Local store only; remote data belongs to the signed-in user
    for name in ["favorites.json", "excluded.json", "ratings.json"] {
        let path = paths.data_dir().join(name);
        remove_if_present(&path, name, output)?;
    }
    Ok(())
}

fn remove_if_present(path: &Path, what: &str, output: &Output) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            color_eyre::eyre::eyre!("Failed to remove {} at {}: {}", what, path.display(), e)
        })?;
        output.success(format!("Cleared {}: {}", what, path.display()));
    } else {
        output.info(format!("No {} found to clear", what));
    }
    Ok(())
}
