//! Integration tests for the Git interface and resolution over real repos.
//!
//! These tests use real git repositories created via tempfile. Remote
//! tracking refs are created with `git update-ref`, so nothing is fetched.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use remotework::core::config::{Config, ResolverSettings};
use remotework::git::{Git, GitBackend, GitError};
use remotework::resolve::{LocalRepo, OriginCause, ResolveError};

const ORIGIN_URL: &str = "git@github.com:me/repo.git";
const UPSTREAM_URL: &str = "https://github.com/org/repo.git";
const FORK_URL: &str = "https://github.com/forker/repo.git";

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a repository on `main` with an initial commit.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        // Pin the push policy so a user-level setting cannot leak in
        run_git(dir.path(), &["config", "push.default", "simple"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    /// A session with default settings.
    fn session(&self) -> LocalRepo<Git> {
        LocalRepo::new(self.git(), ResolverSettings::default())
    }

    fn add_remote(&self, name: &str, url: &str) -> &Self {
        run_git(self.path(), &["remote", "add", name, url]);
        self
    }

    /// Create `refs/remotes/<remote>/<branch>` at HEAD.
    fn remote_branch(&self, remote: &str, branch: &str) -> &Self {
        let refname = format!("refs/remotes/{remote}/{branch}");
        run_git(self.path(), &["update-ref", &refname, "HEAD"]);
        self
    }

    fn checkout_new(&self, branch: &str) -> &Self {
        run_git(self.path(), &["checkout", "-b", branch]);
        self
    }

    fn track(&self, branch: &str, remote: &str, merge: &str) -> &Self {
        run_git(self.path(), &["config", &format!("branch.{branch}.remote"), remote]);
        run_git(
            self.path(),
            &["config", &format!("branch.{branch}.merge"), &format!("refs/heads/{merge}")],
        );
        self
    }

    fn set_config(&self, key: &str, value: &str) -> &Self {
        run_git(self.path(), &["config", key, value]);
        self
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

mod backend {
    use super::*;

    #[test]
    fn open_from_subdirectory() {
        let repo = TestRepo::new();
        let sub = repo.path().join("nested/dir");
        std::fs::create_dir_all(&sub).unwrap();

        let git = Git::open(&sub).unwrap();
        assert!(git.git_dir().ends_with(".git"));
    }

    #[test]
    fn open_outside_repository() {
        let dir = TempDir::new().unwrap();
        let err = Git::open(dir.path()).unwrap_err();
        assert!(matches!(err, GitError::NotARepo { .. }));
    }

    #[test]
    fn list_remotes_with_push_url() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .set_config("remote.origin.pushurl", FORK_URL);

        let remotes = repo.git().list_remotes().unwrap();
        assert_eq!(remotes.len(), 1);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url, ORIGIN_URL);
        assert_eq!(remotes[0].push_url.as_deref(), Some(FORK_URL));
    }

    #[test]
    fn list_remotes_keeps_non_utf8_url() {
        use std::io::Write;

        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL);
        let mut config = std::fs::OpenOptions::new()
            .append(true)
            .open(repo.path().join(".git/config"))
            .unwrap();
        config
            .write_all(b"[remote \"odd\"]\n\turl = https://github.com/me/r\xe9po.git\n")
            .unwrap();

        let remotes = repo.git().list_remotes().unwrap();
        let names: Vec<_> = remotes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["origin", "odd"]);
        assert_eq!(remotes[1].url, "https://github.com/me/r\u{FFFD}po.git");
    }

    #[test]
    fn head_ref_on_branch_and_detached() {
        let repo = TestRepo::new();
        assert_eq!(
            repo.git().head_ref().unwrap().as_deref(),
            Some("refs/heads/main")
        );

        run_git(repo.path(), &["checkout", "--detach"]);
        assert_eq!(repo.git().head_ref().unwrap(), None);
    }

    #[test]
    fn tracking_ref() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .checkout_new("feature")
            .track("feature", "origin", "feature");

        let git = repo.git();
        assert_eq!(
            git.tracking_ref("refs/heads/feature").unwrap().as_deref(),
            Some("refs/remotes/origin/feature")
        );
        assert_eq!(git.tracking_ref("refs/heads/main").unwrap(), None);
    }

    #[test]
    fn config_value() {
        let repo = TestRepo::new();
        repo.set_config("push.default", "upstream");

        let git = repo.git();
        assert_eq!(
            git.config_value("push.default").unwrap().as_deref(),
            Some("upstream")
        );
        assert_eq!(git.config_value("remotework.unset").unwrap(), None);
    }

    #[test]
    fn symbolic_ref_and_existence() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .remote_branch("origin", "trunk");
        run_git(
            repo.path(),
            &["symbolic-ref", "refs/remotes/origin/HEAD", "refs/remotes/origin/trunk"],
        );

        let git = repo.git();
        assert_eq!(
            git.symbolic_ref_target("refs/remotes/origin/HEAD")
                .unwrap()
                .as_deref(),
            Some("refs/remotes/origin/trunk")
        );
        assert_eq!(git.symbolic_ref_target("refs/remotes/fork/HEAD").unwrap(), None);
        // Direct refs have no symbolic target
        assert_eq!(git.symbolic_ref_target("refs/heads/main").unwrap(), None);

        assert!(git.ref_exists("refs/remotes/origin/trunk"));
        assert!(!git.ref_exists("refs/remotes/origin/missing"));
    }

    #[test]
    fn packed_refs_are_visible() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .remote_branch("origin", "feature");
        run_git(repo.path(), &["pack-refs", "--all"]);

        assert!(repo.git().ref_exists("refs/remotes/origin/feature"));
    }
}

mod resolution {
    use super::*;

    #[test]
    fn master_branch_follows_origin_head() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .remote_branch("origin", "develop");
        run_git(
            repo.path(),
            &["symbolic-ref", "refs/remotes/origin/HEAD", "refs/remotes/origin/develop"],
        );

        assert_eq!(
            repo.session().master_branch().as_str(),
            "refs/remotes/origin/develop"
        );
    }

    #[test]
    fn master_branch_falls_back() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL);
        assert_eq!(repo.session().master_branch().as_str(), "refs/heads/master");
    }

    #[test]
    fn main_project_requires_origin() {
        let repo = TestRepo::new();
        repo.add_remote("upstream", UPSTREAM_URL);

        assert!(matches!(
            repo.session().main_project(),
            Err(ResolveError::NoOriginProject {
                cause: OriginCause::Missing,
                ..
            })
        ));
    }

    #[test]
    fn current_project_follows_upstream() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .add_remote("upstream", UPSTREAM_URL)
            .checkout_new("feature")
            .track("feature", "upstream", "feature");

        let mut session = repo.session();
        assert_eq!(session.current_project().unwrap().to_string(), "org/repo");
        assert_eq!(session.main_project().unwrap().to_string(), "me/repo");
    }

    #[test]
    fn publish_ranked_finds_fork_branch() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .add_remote("fork", FORK_URL)
            .checkout_new("feature")
            .remote_branch("fork", "feature");

        let target = repo
            .session()
            .remote_branch_and_project(Some("forker"))
            .unwrap();
        assert_eq!(target.branch.as_str(), "refs/remotes/fork/feature");
        assert_eq!(target.project.to_string(), "forker/repo");
    }

    #[test]
    fn publish_tracking_mode() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .add_remote("upstream", UPSTREAM_URL)
            .checkout_new("feature")
            .track("feature", "upstream", "topic")
            .set_config("push.default", "upstream");

        let target = repo.session().remote_branch_and_project(None).unwrap();
        assert_eq!(target.branch.as_str(), "refs/remotes/upstream/topic");
        assert_eq!(target.project.owner, "org");
    }

    #[test]
    fn publish_tracking_mode_without_upstream() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .checkout_new("feature")
            .set_config("push.default", "tracking");

        assert!(matches!(
            repo.session().remote_branch_and_project(None),
            Err(ResolveError::NoUpstream { branch }) if branch == "feature"
        ));
    }

    #[test]
    fn publish_on_detached_head() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL);
        run_git(repo.path(), &["checkout", "--detach"]);

        assert!(matches!(
            repo.session().remote_branch_and_project(None),
            Err(ResolveError::DetachedHead)
        ));
    }

    #[test]
    fn open_reads_repo_config() {
        let repo = TestRepo::new();
        repo.add_remote("origin", ORIGIN_URL)
            .add_remote("upstream", UPSTREAM_URL);

        let config_path = Config::repo_config_path(repo.git().git_dir());
        std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        std::fs::write(
            &config_path,
            "main_remote = \"upstream\"\nfallback_branch = \"trunk\"\n",
        )
        .unwrap();

        let mut session = LocalRepo::open(repo.path()).unwrap();
        assert_eq!(session.settings().main_remote, "upstream");
        assert_eq!(session.main_project().unwrap().owner, "org");
        assert_eq!(session.master_branch().as_str(), "refs/heads/trunk");
    }
}
