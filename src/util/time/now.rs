#[inline(always)]
pub fn tokio_now() -> tokio::time::Instant {
    tokio::time::Instant::now()
}
