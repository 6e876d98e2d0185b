use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Run `f`, turning a panic into its message.
///
/// Used around calls into impure collaborators whose failure must stay
/// local to that one call.
pub(crate) fn isolate<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

/// Future adapter that catches a panic raised while polling `F`.
///
/// Resolves to `Err(message)` on the poll that panicked and must not be
/// polled again after that.
pub(crate) struct Isolated<F> {
    inner: F,
}

pub(crate) fn isolate_future<F: Future + Unpin>(inner: F) -> Isolated<F> {
    Isolated { inner }
}

impl<F: Future + Unpin> Future for Isolated<F> {
    type Output = Result<F::Output, String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let inner = &mut self.inner;
        match isolate(|| Pin::new(inner).poll(cx)) {
            Ok(Poll::Ready(output)) => Poll::Ready(Ok(output)),
            Ok(Poll::Pending) => Poll::Pending,
            Err(panic) => Poll::Ready(Err(panic)),
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_value_through() {
        assert_eq!(isolate(|| 3), Ok(3));
    }

    #[test]
    fn captures_str_panic() {
        let result: Result<(), String> = isolate(|| panic!("boom"));
        assert_eq!(result, Err("boom".to_string()));
    }

    #[test]
    fn captures_formatted_panic() {
        let code = 7;
        let result: Result<(), String> = isolate(|| panic!("code {code}"));
        assert_eq!(result, Err("code 7".to_string()));
    }

    async fn fails_after_yield() -> u32 {
        tokio::task::yield_now().await;
        panic!("late boom")
    }

    #[tokio::test]
    async fn future_panic_after_yield_is_captured() {
        assert_eq!(
            isolate_future(Box::pin(fails_after_yield())).await,
            Err("late boom".to_string())
        );
    }

    #[tokio::test]
    async fn future_output_passes_through() {
        assert_eq!(isolate_future(Box::pin(async { 5u32 })).await, Ok(5));
    }
}
