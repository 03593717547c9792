use crate::prelude::*;
use crate::util::path::Utf8StemmedPathBuf;

/// Expands a path into the list of files under it. Directories are walked
/// recursively; a plain file expands to just itself.
pub(crate) async fn files(path: impl AsRef<Utf8Path>) -> Result<Vec<Utf8PathBuf>> {
    let path = path.as_ref();

    if !fs::metadata(path).await?.is_dir() {
        return Ok(vec![path.to_owned()]);
    }

    let mut pending = vec![path.to_owned()];
    let mut files = Vec::new();

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let entry_path: Utf8PathBuf = entry.path().try_into().err_into::<anyhow::Error>()?;

            if entry.file_type().await?.is_dir() {
                pending.push(entry_path);
            } else {
                files.push(entry_path);
            }
        }
    }

    // Deterministic processing order regardless of the directory layout
    files.sort_unstable();

    Ok(files)
}

/// Two inputs with the same file stem would map to the same output sticker
/// path, so such runs are rejected upfront.
pub(crate) fn validate_unique_output_names<'a>(
    inputs: impl IntoIterator<Item = &'a Utf8StemmedPathBuf>,
) -> Result {
    let mut duplicates = inputs
        .into_iter()
        .into_group_map_by(|path| path.file_stem())
        .into_iter()
        .filter(|(_, paths)| paths.len() >= 2)
        // Sort to make the test snapshots stable
        .sorted_by_key(|(stem, _)| *stem)
        .peekable();

    if duplicates.peek().is_none() {
        return Ok(());
    }

    let report = duplicates.format_with("\n", |(stem, paths), f| {
        let paths = paths.iter().map(|path| path.as_path()).format(", ");
        f(&format_args!("- {stem}.webm <- [{paths}]"))
    });

    bail!(
        "The following inputs would overwrite each other's output. \
        Give them unique file names.\n{report}"
    );
}
