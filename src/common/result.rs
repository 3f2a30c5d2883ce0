use crate::common::error::BulkerError;

/// bulker全体で使用するResult型のエイリアス
///
/// ```
/// use bulker::common::result::BulkerResult;
/// use bulker::common::error::BulkerError;
///
/// fn lookup() -> BulkerResult<()> {
///     Err(BulkerError::not_found("repository", "api"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type BulkerResult<T> = Result<T, BulkerError>;

/// OptionをBulkerResultに変換するヘルパー
pub trait OptionExt<T> {
    /// Noneの場合は`NotFound`エラーを返す
    fn ok_or_not_found(self, entity: &'static str, name: &str) -> BulkerResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &'static str, name: &str) -> BulkerResult<T> {
        self.ok_or_else(|| BulkerError::not_found(entity, name))
    }
}

/// エラーにコンテキストを付与するヘルパー
pub trait ResultExt<T> {
    /// エラー種別を保ったままメッセージを追加する
    fn context(self, message: impl Into<String>) -> BulkerResult<T>;
}

impl<T> ResultExt<T> for BulkerResult<T> {
    fn context(self, message: impl Into<String>) -> BulkerResult<T> {
        self.map_err(|e| e.context(message))
    }
}
