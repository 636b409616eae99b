use std::{fs, path::Path};

use anyhow::{Context, Result};

/// Human-readable ImageNet class descriptions, indexed by class id.
#[derive(Debug, Clone, Default)]
pub struct ClassLabels {
    descriptions: Vec<String>,
}

impl ClassLabels {
    /// Load a synset-words file (`n01440764 tench, Tinca tinca` per line).
    ///
    /// Lines without a synset prefix are taken verbatim, so plain one-label-per-line
    /// files work too.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read class labels {}", path.display()))?;
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let descriptions = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match line.split_once(' ') {
                Some((synset, desc)) if is_synset_id(synset) => desc.trim().to_string(),
                _ => line.to_string(),
            })
            .collect();
        Self { descriptions }
    }

    pub fn describe(&self, class_index: usize) -> Option<&str> {
        self.descriptions.get(class_index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

fn is_synset_id(token: &str) -> bool {
    token.len() == 9
        && token.starts_with('n')
        && token[1..].chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_synset_prefix() {
        let labels = ClassLabels::parse("n01440764 tench, Tinca tinca\nn01443537 goldfish\n");
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.describe(0), Some("tench, Tinca tinca"));
        assert_eq!(labels.describe(1), Some("goldfish"));
        assert_eq!(labels.describe(2), None);
    }

    #[test]
    fn plain_labels_are_kept_verbatim() {
        let labels = ClassLabels::parse("cat\n\ngolden retriever\n");
        assert_eq!(labels.describe(0), Some("cat"));
        assert_eq!(labels.describe(1), Some("golden retriever"));
    }
}
