use std::collections::HashSet;
use std::path::PathBuf;

/// Hands out image paths inside the output directory, never the same one
/// twice in a run.
#[derive(Debug)]
pub struct OutputNamer {
    out_dir: PathBuf,
    issued: HashSet<PathBuf>,
}

impl OutputNamer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            issued: HashSet::new(),
        }
    }

    /// `<out_dir>/<instance>_<settings>.png`, suffixed `_2`, `_3`, ... on reuse.
    pub fn chart_path(&mut self, instance: &str, settings: &str) -> PathBuf {
        self.issue(&format!("{}_{}", sanitize(instance), sanitize(settings)))
    }

    /// `<out_dir>/compareRuns_<instance>.png`.
    pub fn comparison_path(&mut self, instance: &str) -> PathBuf {
        self.issue(&format!("compareRuns_{}", sanitize(instance)))
    }

    fn issue(&mut self, stem: &str) -> PathBuf {
        let mut path = self.out_dir.join(format!("{stem}.png"));
        let mut n = 2;
        while self.issued.contains(&path) {
            path = self.out_dir.join(format!("{stem}_{n}.png"));
            n += 1;
        }
        self.issued.insert(path.clone());
        path
    }
}

/// Keeps a name inside the output directory.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect()
}
