//! Scaffolding scenarios
//!
//! Each scenario runs the whole pipeline: allocate a staging directory,
//! populate it from a source, mutate it, then commit it into a target.
//! Scenarios that need a real `git` executable skip when none is found.

use clonit_core::{
    Error, GitSource, Source, StagingContext, StagingOptions, create, create_from_path,
};
use clonit_test_utils::TemplateDir;
use clonit_test_utils::git::{commit_all, file_url, git_available, init_repo, tag};
use clonit_test_utils::template::list_tree;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Target directory a scenario scaffolds into.
pub struct TargetDir {
    temp_dir: TempDir,
}

impl Default for TargetDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// A not yet existing project directory inside the scratch area.
    pub fn project(&self) -> PathBuf {
        self.temp_dir.path().join("my-app")
    }

    /// Pre-populate the project directory with a user file.
    pub fn with_existing_file(self, relative: &str, content: &str) -> Self {
        let path = self.project().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn read(&self, relative: &str) -> String {
        let path = self.project().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    pub fn tree(&self) -> Vec<String> {
        list_tree(&self.project())
    }

    pub fn assert_file_not_exists(&self, relative: &str) {
        let path = self.project().join(relative);
        assert!(!path.exists(), "Expected file NOT to exist: {}", path.display());
    }
}

/// A Node-style template with build output that must never be copied.
fn node_template() -> TemplateDir {
    TemplateDir::new()
        .file(
            "package.json",
            r#"{"name": "template", "version": "0.0.0", "scripts": {"start": "node index.js"}}"#,
        )
        .file("index.js", "console.log('__NAME__')\n")
        .file("README.md", "# __NAME__\n")
        .file("LICENSE.template", "MIT\n")
        .file(".gitignore", "node_modules/\n*.log\n")
        .file("node_modules/left-pad/index.js", "module.exports = 1")
        .file("npm-debug.log", "noise")
}

/// A monorepo with one template per package and a tag on the first commit.
fn monorepo() -> TemplateDir {
    let repo = TemplateDir::new()
        .file("README.md", "# templates\n")
        .file("templates/web/package.json", r#"{"name": "web"}"#)
        .file("templates/web/src/main.ts", "export const name = '__NAME__'\n")
        .file("templates/cli/Cargo.toml", "[package]\nname = \"cli\"\n");
    init_repo(repo.path());
    commit_all(repo.path(), "Initial templates");
    tag(repo.path(), "v1");
    fs::write(repo.join("README.md"), "# templates v2\n").unwrap();
    commit_all(repo.path(), "Bump readme");
    repo
}

/// The usual customisation pass over a freshly staged project.
async fn personalise(ctx: &StagingContext, name: &str) {
    ctx.update_json("package.json", |mut doc| async move {
        doc.insert("name".into(), json!(name));
        Some(doc)
    })
    .await
    .unwrap();
    for file in ["index.js", "README.md"] {
        ctx.update(file, |content| async move {
            Some(content.replace("__NAME__", name))
        })
        .await
        .unwrap();
    }
    ctx.rename("LICENSE.template", "LICENSE").await.unwrap();
    ctx.create(".env", Some("PORT=3000\n"), false).await.unwrap();
}

// =============================================================================
// Scenario 1: Local templates
// =============================================================================

mod local_template {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn scaffold_personalise_and_commit() {
        let template = node_template();
        let target = TargetDir::new();

        let mut ctx = create_from_path(template.path(), StagingOptions::default())
            .await
            .unwrap();
        let staging = ctx.staging_root().to_path_buf();
        personalise(&ctx, "my-app").await;
        ctx.out(target.project()).await.unwrap();

        assert_eq!(
            target.tree(),
            vec![".env", ".gitignore", "LICENSE", "README.md", "index.js", "package.json"]
        );
        assert_eq!(target.read("README.md"), "# my-app\n");
        assert_eq!(target.read("index.js"), "console.log('my-app')\n");
        let package: serde_json::Value =
            serde_json::from_str(&target.read("package.json")).unwrap();
        assert_eq!(package["name"], "my-app");
        assert_eq!(package["scripts"]["start"], "node index.js");
        assert!(!staging.exists());
        // The template itself is never modified
        assert_eq!(
            fs::read_to_string(template.join("README.md")).unwrap(),
            "# __NAME__\n"
        );
    }

    #[tokio::test]
    async fn explicit_ignore_list_replaces_gitignore() {
        let template = node_template();
        let target = TargetDir::new();

        let options = StagingOptions::new().ignore(["node_modules", ".gitignore"]);
        let mut ctx = create_from_path(template.path(), options).await.unwrap();
        ctx.out(target.project()).await.unwrap();

        assert!(target.tree().contains(&"npm-debug.log".to_string()));
        target.assert_file_not_exists("node_modules");
        target.assert_file_not_exists(".gitignore");
    }

    #[tokio::test]
    async fn mutations_cannot_escape_staging() {
        let template = node_template();
        let scratch = TempDir::new().unwrap();
        let victim = scratch.path().join("victim.txt");
        fs::write(&victim, "untouched").unwrap();

        let mut ctx = create_from_path(template.path(), StagingOptions::default())
            .await
            .unwrap();
        let escape = format!("../{}", victim.display());
        let absolute = victim.display().to_string();

        for path in [escape.as_str(), absolute.as_str(), "../../../../etc/hosts"] {
            assert!(ctx.delete(path).await.unwrap_err().is_containment());
            assert!(
                ctx.create(path, Some("pwned"), false)
                    .await
                    .unwrap_err()
                    .is_containment()
            );
        }

        assert_eq!(fs::read_to_string(&victim).unwrap(), "untouched");
        ctx.cleanup().await.unwrap();
    }
}

// =============================================================================
// Scenario 2: Committing into existing directories
// =============================================================================

mod commit {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn refuses_non_empty_target_then_recovers_with_cleanup() {
        let template = node_template();
        let target = TargetDir::new().with_existing_file("notes.txt", "mine");

        let mut ctx = create_from_path(template.path(), StagingOptions::default())
            .await
            .unwrap();
        let staging = ctx.staging_root().to_path_buf();

        let err = ctx.out(target.project()).await.unwrap_err();
        assert!(matches!(err, Error::TargetNotEmpty { ref path } if path == &target.project()));
        assert_eq!(target.tree(), vec!["notes.txt"]);
        assert!(staging.is_dir());

        ctx.cleanup().await.unwrap();
        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn overwrite_merges_into_existing_project() {
        let template = node_template();
        let target = TargetDir::new()
            .with_existing_file("notes.txt", "mine")
            .with_existing_file("README.md", "old readme");

        let options = StagingOptions::new().overwrite(true);
        let mut ctx = create_from_path(template.path(), options).await.unwrap();
        ctx.out(target.project()).await.unwrap();

        assert_eq!(target.read("notes.txt"), "mine");
        assert_eq!(target.read("README.md"), "# __NAME__\n");
    }

    #[tokio::test]
    async fn dry_run_reports_without_touching_disk() {
        let template = node_template();
        let target = TargetDir::new();

        let options = StagingOptions::new().dry_run(true);
        let mut ctx = create_from_path(template.path(), options).await.unwrap();
        let staging = ctx.staging_root().to_path_buf();
        let before = list_tree(&staging);

        personalise(&ctx, "my-app").await;
        ctx.out(target.project()).await.unwrap();

        assert_eq!(list_tree(&staging), before);
        assert!(!target.project().exists());
        ctx.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn options_loaded_from_config_file() {
        let template = node_template();
        let target = TargetDir::new();
        let config_dir = TempDir::new().unwrap();
        let config = config_dir.path().join("clonit.toml");
        fs::write(
            &config,
            "ignore_patterns = [\"node_modules\"]\nkeep_staging_on_commit = true\n",
        )
        .unwrap();

        let options = StagingOptions::load(&config).unwrap();
        let mut ctx = create_from_path(template.path(), options).await.unwrap();
        let staging = ctx.staging_root().to_path_buf();
        ctx.out(target.project()).await.unwrap();

        target.assert_file_not_exists("node_modules");
        assert!(staging.join("package.json").is_file());
        ctx.cleanup().await.unwrap();
    }
}

// =============================================================================
// Scenario 3: Git templates
// =============================================================================

mod git_template {
    use super::*;
    use pretty_assertions::assert_eq;

    fn skip() -> bool {
        if git_available() {
            return false;
        }
        eprintln!("Skipping test: git not available");
        true
    }

    #[tokio::test]
    async fn sparse_subdirectory_becomes_project_root() {
        if skip() {
            return;
        }
        let repo = monorepo();
        let target = TargetDir::new();

        let source = GitSource::new(file_url(repo.path())).sparse(["templates/web"]);
        let mut ctx = create(source, StagingOptions::default()).await.unwrap();
        ctx.update("src/main.ts", |content| async move {
            Some(content.replace("__NAME__", "web-app"))
        })
        .await
        .unwrap();
        ctx.out(target.project()).await.unwrap();

        assert_eq!(target.tree(), vec!["package.json", "src/main.ts"]);
        assert_eq!(target.read("src/main.ts"), "export const name = 'web-app'\n");
    }

    #[tokio::test]
    async fn tag_pins_template_version() {
        if skip() {
            return;
        }
        let repo = monorepo();
        let target = TargetDir::new();

        let source = GitSource::new(file_url(repo.path())).tag("v1");
        let options = StagingOptions::new().ignore([".git"]);
        let mut ctx = create(source, options).await.unwrap();
        ctx.out(target.project()).await.unwrap();

        assert_eq!(target.read("README.md"), "# templates\n");
        target.assert_file_not_exists(".git");
    }

    #[tokio::test]
    async fn file_url_detects_as_directory_but_clones_explicitly() {
        if skip() {
            return;
        }
        let repo = monorepo();

        let source = Source::detect(&file_url(repo.path()));
        assert!(matches!(source, Source::Filesystem(_)));
        let remote = Source::from(GitSource::new(file_url(repo.path())));
        let mut ctx = create(remote, StagingOptions::default()).await.unwrap();

        assert_eq!(ctx.read("README.md").await.unwrap(), "# templates v2\n");
        ctx.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn failed_clone_reports_staging_directory() {
        if skip() {
            return;
        }
        let repo = monorepo();

        let source = GitSource::new(file_url(repo.path())).branch("missing");
        let err = create(source, StagingOptions::default()).await.unwrap_err();

        let Error::Populate { staging, source } = err else {
            panic!("expected populate error, got {err:?}");
        };
        assert!(matches!(*source, Error::Git(_)));
        remove_if_present(&staging);
    }
}

fn remove_if_present(path: &Path) {
    if path.exists() {
        fs::remove_dir_all(path).unwrap();
    }
}
