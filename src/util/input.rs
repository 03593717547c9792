use crate::prelude::*;

/// Asks a yes/no question on the terminal. With `auto_confirm` the default
/// answer is assumed without asking.
pub(crate) async fn confirm(message: &str, default: bool, auto_confirm: bool) -> Result<bool> {
    if auto_confirm {
        return Ok(default);
    }

    let hint = if default { "[Y/n]" } else { "[y/N]" };

    warn!("{message} {hint}");

    let line = read_line(None)
        .await?
        .context("Reached end-of-file (EOF) while reading the answer from `stdin`")?;

    let line = line.trim();

    Ok(if line.is_empty() {
        default
    } else {
        line.eq_ignore_ascii_case("y") || line.eq_ignore_ascii_case("yes")
    })
}

/// Reads input paths from the terminal, one per line. An empty line or EOF
/// finishes the list. Nonexistent paths are rejected and asked for again.
pub(crate) async fn read_path_list() -> Result<Vec<Utf8PathBuf>> {
    info!("Enter input file or folder paths, one per line. An empty line finishes the list.");

    let mut paths = Vec::new();

    loop {
        let Some(line) = read_line(Some("> ")).await? else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let path = Utf8PathBuf::from(line);

        if !path.try_exists().unwrap_or(false) {
            error!("Path does not exist: `{path}`");
            continue;
        }

        paths.push(path);
    }

    ensure!(!paths.is_empty(), "No input paths were provided");

    Ok(paths)
}

async fn read_line(marker: Option<&str>) -> Result<Option<String>> {
    let marker = marker.map(ToOwned::to_owned);

    // Tokio recommends spawning a blocking thread for user input
    // https://docs.rs/tokio/latest/tokio/io/struct.Stdin.html
    tokio::task::spawn_blocking(move || {
        if let Some(marker) = marker {
            use std::io::Write as _;
            print!("{marker}");
            std::io::stdout().flush().context("Failed to flush stdout")?;
        }

        std::io::stdin()
            .lines()
            .next()
            .transpose()
            .context("Failed to read a line from `stdin`")
    })
    .await
    .expect("Failed to spawn a blocking task for user input")
}
