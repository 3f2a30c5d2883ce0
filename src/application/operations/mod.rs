//! 各コマンドが実行するリポジトリ単位の操作

pub mod exec;
pub mod files;
pub mod git;
pub mod groups;
pub mod properties;
pub mod repos;

pub use exec::ExecCommand;
pub use files::{CopyFile, RenameFile, ReplaceInFiles, SearchFiles};
pub use git::{BranchAction, BranchCommand, CloneRepo, ListBranches, PullRepo, PushRepo, RepoStatus};
pub use properties::GetProperty;
pub use repos::ListRepos;
