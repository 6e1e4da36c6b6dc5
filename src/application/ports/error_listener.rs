//! Error Listener Port - 错误观察者
//!
//! 队列控制器在每次报告错误时回调

/// Error Listener Port
pub trait ErrorListener: Send + Sync {
    /// 收到一条可读的错误信息
    fn on_error(&self, message: &str);
}

impl<F> ErrorListener for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_error(&self, message: &str) {
        self(message)
    }
}
