//! Library filename and path formatting.
//!
//! Media lands as `{library}/{Title}/{Title} - SxxEyy{ext}`. Episodes
//! without a number are treated as movies or clips and keep just the title.

use std::path::{Path, PathBuf};

/// Strip characters that are unsafe in directory and file names; keeps
/// alphanumerics, spaces, and ` .()_-`.
pub fn sanitize_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || " .()_-".contains(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Render an episode filename: `Title - S01E05.mkv`. Without an episode
/// number the title alone is used (movie/clip).
pub fn episode_filename(
    title: &str,
    season: Option<u32>,
    episode: Option<u32>,
    ext: &str,
) -> String {
    match episode {
        Some(ep) => format!("{title} - S{:02}E{ep:02}{ext}", season.unwrap_or(1)),
        None => format!("{title}{ext}"),
    }
}

/// Build `root/title/filename`, creating the title directory.
pub fn target_path(root: &Path, title: &str, filename: &str) -> std::io::Result<PathBuf> {
    let dir = root.join(title);
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(filename))
}

/// Extension of the original filename including the dot, defaulting to
/// `.mp4` when it has none.
pub fn extension_or_default(original_name: &str) -> String {
    match Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext) if !ext.is_empty() => format!(".{ext}"),
        _ => ".mp4".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(
            sanitize_title("Frieren: Beyond Journey's End!"),
            "Frieren Beyond Journeys End"
        );
        assert_eq!(sanitize_title("  Mob Psycho 100 (2016) "), "Mob Psycho 100 (2016)");
        assert_eq!(sanitize_title("Ві/йна*світів"), "Війнасвітів");
    }

    #[test]
    fn episode_filename_formats() {
        assert_eq!(
            episode_filename("Show", Some(2), Some(5), ".mkv"),
            "Show - S02E05.mkv"
        );
        assert_eq!(
            episode_filename("Show", None, Some(12), ".mp4"),
            "Show - S01E12.mp4"
        );
        assert_eq!(episode_filename("Movie", Some(1), None, ".mp4"), "Movie.mp4");
        assert_eq!(episode_filename("Movie", None, None, ".avi"), "Movie.avi");
    }

    #[test]
    fn target_path_creates_title_directory() {
        let dir = tempfile::tempdir().unwrap();
        let p = target_path(dir.path(), "Show", "Show - S01E01.mkv").unwrap();
        assert_eq!(p, dir.path().join("Show").join("Show - S01E01.mkv"));
        assert!(dir.path().join("Show").is_dir());
    }

    #[test]
    fn extension_fallback() {
        assert_eq!(extension_or_default("ep01.mkv"), ".mkv");
        assert_eq!(extension_or_default("video"), ".mp4");
        assert_eq!(extension_or_default("archive.tar.gz"), ".gz");
    }
}
