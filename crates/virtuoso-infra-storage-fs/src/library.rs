use crate::files::read_optional;
use std::path::PathBuf;
use virtuoso_ports::generation::{
    GeneratedSongDto, GenerationError, GenerationRequest, SongGeneratorPort,
};

/// Offline song source: serves charts from `<dir>/<topic-slug>.json`, or
/// `<dir>/<topic-slug>-<difficulty>.json` when a difficulty-specific chart
/// exists. Files use the same JSON shape a remote generator returns.
pub struct FsSongLibrary {
    dir: PathBuf,
}

impl FsSongLibrary {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn candidates(&self, request: &GenerationRequest) -> Vec<PathBuf> {
        let slug = slugify(&request.topic);
        let difficulty = request.difficulty.to_string().to_ascii_lowercase();
        vec![
            self.dir.join(format!("{slug}-{difficulty}.json")),
            self.dir.join(format!("{slug}.json")),
        ]
    }
}

impl SongGeneratorPort for FsSongLibrary {
    fn generate(&self, request: &GenerationRequest) -> Result<GeneratedSongDto, GenerationError> {
        for path in self.candidates(request) {
            let data = read_optional(&path)
                .map_err(|err| GenerationError::Provider(format!("{}: {err}", path.display())))?;
            let Some(data) = data else {
                continue;
            };
            log::info!("loading chart {}", path.display());
            return serde_json::from_str(&data)
                .map_err(|e| GenerationError::Malformed(format!("{}: {e}", path.display())));
        }

        Err(GenerationError::Provider(format!(
            "no chart for topic {:?} in {}",
            request.topic,
            self.dir.display()
        )))
    }
}

/// Lowercase ASCII alphanumerics, everything else collapsed to single dashes.
pub fn slugify(topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    for ch in topic.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Pop hits! "), "pop-hits");
        assert_eq!(slugify("Spooky -- melody"), "spooky-melody");
        assert_eq!(slugify("???"), "");
    }
}
