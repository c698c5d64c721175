//! End-to-end resolution scenarios against the mock backend.
//!
//! Each test drives a [`LocalRepo`] through its public API only, the way a
//! forge client would.

use remotework::core::config::{Config, ResolverSettings};
use remotework::core::types::Branch;
use remotework::forge::{parse_project, KnownHosts, Project};
use remotework::git::mock::{MockBackend, MockQuery, QueryKind};
use remotework::resolve::{LocalRepo, OriginCause, PublishTarget, ResolveError};

fn session(backend: MockBackend) -> LocalRepo<MockBackend> {
    LocalRepo::new(backend, ResolverSettings::default())
}

fn names(repo: &mut LocalRepo<MockBackend>, owner: Option<&str>) -> Vec<String> {
    repo.remotes_for_publish(owner)
        .into_iter()
        .map(|r| r.name)
        .collect()
}

mod catalog {
    use super::*;

    #[test]
    fn lookups_share_one_load() {
        let backend = MockBackend::new()
            .with_remote("origin", "git@github.com:me/repo.git")
            .with_remote("upstream", "https://github.com/org/repo.git")
            .on_branch("feature");
        let mut repo = session(backend.clone());

        for _ in 0..3 {
            repo.remote_by_name("origin").unwrap();
            repo.remote_by_name("upstream").unwrap();
            let _ = repo.remote_by_name("missing");
        }
        repo.main_project().unwrap();
        repo.current_project().unwrap();
        repo.remotes_for_publish(Some("me"));
        repo.master_branch();

        assert_eq!(backend.call_count(QueryKind::ListRemotes), 1);
    }

    #[test]
    fn absent_names_are_not_found() {
        let mut repo = session(MockBackend::new().with_remote("origin", "x"));
        for name in ["", "ORIGIN", "origin ", "upstream"] {
            assert!(matches!(
                repo.remote_by_name(name),
                Err(ResolveError::RemoteNotFound { .. })
            ));
        }
    }
}

mod publish_ranking {
    use super::*;

    #[test]
    fn without_owner_only_canonical_remotes() {
        let mut repo = session(
            MockBackend::new()
                .with_remote("origin", "https://github.com/x/repo")
                .with_remote("b", "https://github.com/y/repo"),
        );
        assert_eq!(names(&mut repo, Some("")), ["origin"]);
        assert_eq!(names(&mut repo, None), ["origin"]);
    }

    #[test]
    fn owner_matches_come_first_reversed() {
        let mut repo = session(
            MockBackend::new()
                .with_remote("origin", "https://github.com/A/repo")
                .with_remote("fork1", "https://github.com/B/repo")
                .with_remote("fork2", "https://github.com/B/repo"),
        );
        assert_eq!(names(&mut repo, Some("B")), ["fork2", "fork1", "origin"]);
    }

    #[test]
    fn configured_priority_replaces_canonical_list() {
        let settings = ResolverSettings {
            remote_priority: vec!["upstream".into(), "origin".into()],
            ..Default::default()
        };
        let mut repo = LocalRepo::new(
            MockBackend::new()
                .with_remote("origin", "https://github.com/o/repo")
                .with_remote("github", "https://github.com/g/repo")
                .with_remote("upstream", "https://github.com/u/repo"),
            settings,
        );
        assert_eq!(names(&mut repo, None), ["upstream", "origin"]);
    }
}

mod publish_target {
    use super::*;

    #[test]
    fn upstream_mode_without_tracking_branch() {
        let mut repo = session(
            MockBackend::new()
                .with_remote("origin", "https://github.com/me/repo")
                .on_branch("feature")
                .with_config("push.default", "upstream"),
        );
        assert!(matches!(
            repo.remote_branch_and_project(None),
            Err(ResolveError::NoUpstream { .. })
        ));
    }

    #[test]
    fn ranked_mode_reresolves_project_from_fork() {
        let mut repo = session(
            MockBackend::new()
                .with_remote("origin", "https://github.com/me/repo")
                .with_remote("fork", "https://github.com/forker/repo")
                .on_branch("feature")
                .with_ref("refs/remotes/fork/feature"),
        );

        // fork is a candidate through the owner filter: [fork, origin]
        let target = repo.remote_branch_and_project(Some("forker")).unwrap();
        assert_eq!(
            target,
            PublishTarget {
                branch: Branch::new("refs/remotes/fork/feature"),
                project: Project::new("forker", "repo", "github.com"),
            }
        );
    }

    #[test]
    fn ranked_scan_skips_candidate_without_branch() {
        let settings = ResolverSettings {
            remote_priority: vec!["origin".into(), "fork".into()],
            ..Default::default()
        };
        let backend = MockBackend::new()
            .with_remote("origin", "https://github.com/me/repo")
            .with_remote("fork", "https://github.com/forker/repo")
            .on_branch("feature")
            .with_ref("refs/remotes/fork/feature");
        let mut repo = LocalRepo::new(backend.clone(), settings);

        assert_eq!(names(&mut repo, None), ["origin", "fork"]);
        backend.clear_queries();

        let target = repo.remote_branch_and_project(None).unwrap();
        assert_eq!(target.branch.as_str(), "refs/remotes/fork/feature");
        assert_eq!(target.project.to_string(), "forker/repo");

        let probed: Vec<_> = backend
            .queries()
            .into_iter()
            .filter_map(|q| match q {
                MockQuery::RefExists { refname } => Some(refname),
                _ => None,
            })
            .collect();
        assert_eq!(
            probed,
            ["refs/remotes/origin/feature", "refs/remotes/fork/feature"]
        );
    }

    #[test]
    fn enterprise_host_from_settings() {
        let settings = ResolverSettings {
            hosts: KnownHosts::new(["git.corp.example"]),
            ..Default::default()
        };
        let mut repo = LocalRepo::new(
            MockBackend::new()
                .with_remote("origin", "git@git.corp.example:team/tool.git")
                .on_branch("main"),
            settings,
        );

        let target = repo.remote_branch_and_project(None).unwrap();
        assert_eq!(target.project.host, "git.corp.example");
        assert_eq!(
            target.project.web_url(),
            "https://git.corp.example/team/tool"
        );
    }

    #[test]
    fn unknown_host_origin_is_no_origin_project() {
        let mut repo = session(
            MockBackend::new()
                .with_remote("origin", "git@git.corp.example:team/tool.git")
                .on_branch("main"),
        );
        assert!(matches!(
            repo.remote_branch_and_project(None),
            Err(ResolveError::NoOriginProject {
                cause: OriginCause::Unrecognized { .. },
                ..
            })
        ));
    }
}

mod settings {
    use super::*;

    #[test]
    fn config_defaults_match_settings_defaults() {
        let settings = Config::load_from(None, None).unwrap().settings().unwrap();
        assert_eq!(settings, ResolverSettings::default());
    }
}

#[test]
fn remote_tracking_branch_round_trips_to_project() {
    let remotes = [
        ("origin", "git@github.com:me/repo.git"),
        ("upstream", "https://github.com/org/repo.git"),
        ("fork", "ssh://git@github.com/forker/repo"),
    ];
    let backend = remotes
        .iter()
        .fold(MockBackend::new(), |b, (name, url)| b.with_remote(name, url));
    let mut repo = session(backend);
    let hosts = KnownHosts::default();

    for (name, url) in remotes {
        let branch = Branch::remote_tracking(name, "topic/x");
        let remote_name = branch.remote_name().unwrap();
        let remote = repo.remote_by_name(remote_name).unwrap();
        assert_eq!(
            repo.project_of(&remote).unwrap(),
            parse_project(url, &hosts).unwrap()
        );
    }
}
