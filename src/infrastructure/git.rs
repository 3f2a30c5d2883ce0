use std::path::Path;

use super::shell::{run_checked, Shell};
use crate::common::result::BulkerResult;
use crate::domain::value_objects::BranchScope;

const GIT: &str = "git";

/// Thin wrapper shelling out to the `git` executable in one working copy
pub struct Git<'a> {
    shell: &'a dyn Shell,
    dir: &'a Path,
}

impl<'a> Git<'a> {
    pub fn new(shell: &'a dyn Shell, dir: &'a Path) -> Self {
        Self { shell, dir }
    }

    async fn git(&self, args: &[&str]) -> BulkerResult<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        run_checked(self.shell, self.dir, GIT, &args).await
    }

    /// `git clone <url> <dest>`, run from `self.dir`
    pub async fn clone_into(&self, url: &str, dest: &Path) -> BulkerResult<()> {
        let dest = dest.to_string_lossy();
        self.git(&["clone", url, &dest]).await.map(|_| ())
    }

    pub async fn pull(&self) -> BulkerResult<String> {
        self.git(&["pull", "--ff-only"]).await
    }

    pub async fn push(&self) -> BulkerResult<String> {
        self.git(&["push"]).await
    }

    pub async fn current_branch(&self) -> BulkerResult<String> {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    /// Porcelain status lines, one per changed path
    pub async fn changes(&self) -> BulkerResult<Vec<String>> {
        let out = self.git(&["status", "--porcelain"]).await?;
        Ok(non_empty_lines(&out))
    }

    pub async fn branches(&self, scope: BranchScope) -> BulkerResult<Vec<String>> {
        let mut args = vec!["branch", "--format=%(refname:short)"];
        if let Some(flag) = scope.git_flag() {
            args.push(flag);
        }
        let out = self.git(&args).await?;
        Ok(non_empty_lines(&out))
    }

    pub async fn create_branch(&self, name: &str) -> BulkerResult<()> {
        self.git(&["branch", name]).await.map(|_| ())
    }

    pub async fn delete_branch(&self, name: &str) -> BulkerResult<()> {
        self.git(&["branch", "-d", name]).await.map(|_| ())
    }

    pub async fn checkout(&self, name: &str) -> BulkerResult<()> {
        self.git(&["checkout", name]).await.map(|_| ())
    }
}

fn non_empty_lines(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::shell::{CommandOutput, MockShell};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ok(stdout: &str) -> BulkerResult<CommandOutput> {
        Ok(CommandOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    #[tokio::test]
    async fn test_branches_remote_scope() {
        let mut shell = MockShell::new();
        shell
            .expect_run()
            .withf(|_, program, args| {
                program.to_string() == "git"
                    && args.to_vec() == strings(&["branch", "--format=%(refname:short)", "--remotes"])
            })
            .times(1)
            .returning(|_, _, _| ok("origin/main\norigin/dev\n"));

        let dir = Path::new("/work/api");
        let branches = Git::new(&shell, dir).branches(BranchScope::Remote).await.unwrap();
        assert_eq!(branches, vec!["origin/main", "origin/dev"]);
    }

    #[tokio::test]
    async fn test_changes_skips_blank_lines() {
        let mut shell = MockShell::new();
        shell
            .expect_run()
            .withf(|dir, _, args| {
                dir.to_path_buf() == Path::new("/work/api").to_path_buf()
                    && args.to_vec() == strings(&["status", "--porcelain"])
            })
            .returning(|_, _, _| ok(" M src/lib.rs\n?? notes.txt\n\n"));

        let changes = Git::new(&shell, Path::new("/work/api")).changes().await.unwrap();
        assert_eq!(changes, vec![" M src/lib.rs", "?? notes.txt"]);
    }
}
