/// Builds a [`ToolCallRequest`](crate::ToolCallRequest) with JSON-literal arguments.
///
/// An optional trailing priority shorthand (`high`, `normal`, `low`) sets the
/// admission priority.
///
/// ```rust
/// use warden::{ToolPriority, warden_call};
///
/// let call = warden_call!("run-1", "web.search", {"q": "rust", "num": 3}, high);
/// assert_eq!(call.name, "web.search");
/// assert_eq!(call.arguments["num"], 3);
/// assert_eq!(call.priority, ToolPriority::High);
/// ```
#[macro_export]
macro_rules! warden_call {
    ($run_id:expr, $name:expr, $args:tt $(,)?) => {
        $crate::ToolCallRequest::new($run_id, $name, $crate::serde_json::json!($args))
    };
    ($run_id:expr, $name:expr, $args:tt, high $(,)?) => {
        $crate::warden_call!($run_id, $name, $args)
            .with_priority($crate::ToolPriority::High)
    };
    ($run_id:expr, $name:expr, $args:tt, normal $(,)?) => {
        $crate::warden_call!($run_id, $name, $args)
            .with_priority($crate::ToolPriority::Normal)
    };
    ($run_id:expr, $name:expr, $args:tt, low $(,)?) => {
        $crate::warden_call!($run_id, $name, $args)
            .with_priority($crate::ToolPriority::Low)
    };
    ($run_id:expr, $name:expr, $args:tt, $priority:ident $(,)?) => {
        compile_error!("unsupported priority: use high, normal, or low");
    };
}

/// Creates a `Vec<ToolCallRequest>` for one run from `;`-separated `name => args` entries.
///
/// ```rust
/// use warden::{ToolPriority, warden_calls};
///
/// let calls = warden_calls!("run-1";
///     "web.search" => {"q": "rust"};
///     "web.fetch" => {"url": "https://www.rust-lang.org"}, low;
/// );
///
/// assert_eq!(calls.len(), 2);
/// assert_eq!(calls[1].priority, ToolPriority::Low);
/// assert!(calls.iter().all(|call| call.run_id.as_str() == "run-1"));
/// ```
#[macro_export]
macro_rules! warden_calls {
    ($run_id:expr $(;)?) => {
        Vec::<$crate::ToolCallRequest>::new()
    };
    ($run_id:expr; $($name:expr => $args:tt $(, $priority:ident)?);+ $(;)?) => {
        vec![$($crate::warden_call!($run_id, $name, $args $(, $priority)?)),+]
    };
}
