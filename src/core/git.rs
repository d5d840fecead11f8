use anyhow::{Context, Result, anyhow};
use git2::{DiffFindOptions, DiffFormat, DiffOptions, ErrorCode, Index, Repository, Tree};
use std::path::{Path, PathBuf};

/// Trait defining the Git operations required by the guard.
/// This abstraction allows for easier testing and decoupling from specific git implementations.
pub trait GitClient {
    /// Returns the repository-relative paths that differ between the index and HEAD.
    fn get_staged_files(&self) -> Result<Vec<String>>;

    /// Returns the unified diff of one file's staged content against HEAD,
    /// in the text form `git diff --cached <path>` prints.
    fn staged_diff(&self, path: &str) -> Result<String>;

    /// Stages files (adds them to the index).
    fn stage_files(&self, paths: &[String]) -> Result<()>;

    /// Checks if a file exists in the working directory.
    fn file_exists(&self, path: &str) -> bool;

    /// Read file from working directory
    fn read_working_file(&self, path: &str) -> Result<String>;

    /// Write file to working directory
    fn write_working_file(&self, path: &str, content: &str) -> Result<()>;
}

/// Concrete implementation of GitClient using the git2 crate.
pub struct Git2Client {
    repo: Repository,
    root: PathBuf,
}

impl Git2Client {
    /// Opens the repository at `path`, using the index named by
    /// `GIT_INDEX_FILE` when git provides one. `git commit -a` and
    /// `git commit <paths>` run the hook against such a temporary index.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let index_file = std::env::var_os("GIT_INDEX_FILE")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::with_index_file(path, index_file)
    }

    /// Opens the repository at `path`; `index_file` replaces `.git/index`.
    /// A relative `index_file` is taken relative to the current directory,
    /// as git does.
    pub fn with_index_file<P: AsRef<Path>>(path: P, index_file: Option<PathBuf>) -> Result<Self> {
        let repo = Repository::open(path.as_ref())
            .with_context(|| format!("Failed to open repository at {}", path.as_ref().display()))?;
        let root = repo
            .workdir()
            .ok_or_else(|| anyhow!("Repository has no working directory (bare repository)"))?
            .to_path_buf();

        if let Some(index_file) = index_file {
            let index_file = if index_file.is_absolute() {
                index_file
            } else {
                std::env::current_dir()?.join(index_file)
            };
            log::debug!("using index {}", index_file.display());
            let mut index = Index::open(&index_file)
                .with_context(|| format!("Failed to open index {}", index_file.display()))?;
            repo.set_index(&mut index)?;
        }

        Ok(Self { repo, root })
    }

    pub fn get_repo_root(&self) -> &Path {
        &self.root
    }

    /// The tree HEAD points at, or `None` before the first commit.
    fn head_tree(&self) -> Result<Option<Tree<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl GitClient for Git2Client {
    fn get_staged_files(&self) -> Result<Vec<String>> {
        let index = self.repo.index()?;
        let head_tree = self.head_tree()?;
        let mut options = DiffOptions::new();

        // Without a HEAD the diff runs against the empty tree (initial commit).
        let mut diff =
            self.repo
                .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut options))?;
        // Renames collapse to their new path, as `git diff --cached --name-only` lists them.
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))?;

        let mut staged_files = Vec::new();
        for delta in diff.deltas() {
            // Deletions still carry the path on the new side.
            if let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) {
                let path = path.to_string_lossy().into_owned();
                if !path.is_empty() {
                    staged_files.push(path);
                }
            }
        }

        log::debug!("{} staged file(s)", staged_files.len());
        Ok(staged_files)
    }

    fn staged_diff(&self, path: &str) -> Result<String> {
        let index = self.repo.index()?;
        let head_tree = self.head_tree()?;
        let mut options = DiffOptions::new();
        options.pathspec(path).disable_pathspec_match(true);

        let diff =
            self.repo
                .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut options))?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            // Content lines come without their origin marker; file and hunk
            // headers already carry their own text.
            if let origin @ ('+' | '-' | ' ') = line.origin() {
                text.push(origin);
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })
        .with_context(|| format!("Failed to diff staged content of {path}"))?;

        Ok(text)
    }

    fn stage_files(&self, paths: &[String]) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            index
                .add_path(Path::new(path))
                .with_context(|| format!("Failed to stage {path}"))?;
        }
        index.write()?;
        Ok(())
    }

    fn file_exists(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }

    fn read_working_file(&self, path: &str) -> Result<String> {
        let content = std::fs::read_to_string(self.root.join(path))
            .with_context(|| format!("Failed to read {path}"))?;
        Ok(content)
    }

    fn write_working_file(&self, path: &str, content: &str) -> Result<()> {
        std::fs::write(self.root.join(path), content)
            .with_context(|| format!("Failed to write {path}"))?;
        Ok(())
    }
}
