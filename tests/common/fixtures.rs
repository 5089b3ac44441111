use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A throwaway repository on `main` with a fixed identity.
pub struct TestRepo {
    temp_dir: TempDir,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Initialized but without any commit.
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let repo = Self { temp_dir };

        repo.git(&["init"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["config", "tag.gpgsign", "false"]);

        repo
    }

    pub fn new() -> Self {
        let repo = Self::empty();
        repo.commit_file("test.txt", "Initial content", &["Initial commit"]);
        repo
    }

    pub fn new_with_commits(count: usize) -> Self {
        let repo = Self::new();

        for i in 1..count {
            let content = format!("Content version {}", i);
            repo.commit_file("test.txt", &content, &[&format!("Commit {}", i)]);
        }

        repo
    }

    /// `main` merges `feature` with `--no-ff`; returns (main parent, feature parent).
    pub fn new_with_merge() -> (Self, String, String) {
        let repo = Self::new();

        repo.git(&["checkout", "-q", "-b", "feature"]);
        repo.commit_file("feature.txt", "feature work", &["Add feature"]);
        let feature_head = repo.head();

        repo.git(&["checkout", "-q", "main"]);
        repo.commit_file("main.txt", "main work", &["Work on main"]);
        let main_head = repo.head();

        repo.git(&["merge", "-q", "--no-ff", "--no-edit", "feature", "-m", "Merge branch 'feature'"]);

        (repo, main_head, feature_head)
    }

    /// Each entry of `messages` becomes one paragraph (`git commit -m`).
    pub fn commit_file(&self, name: &str, content: &str, messages: &[&str]) {
        fs::write(self.path().join(name), content).unwrap();
        self.git(&["add", "."]);

        let mut args = vec!["commit", "-q"];
        for &message in messages {
            args.push("-m");
            args.push(message);
        }
        self.git(&args);
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
