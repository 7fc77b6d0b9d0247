use tracing::Level;
use tracing_web::MakeWebConsoleWriter;

/// Routes `tracing` output to the browser console (`console.error` for
/// errors, `console.warn` for warnings and so on). Safe to call more than
/// once; later calls are ignored.
pub fn init() -> bool {
    // no clock in wasm32-unknown-unknown
    tracing_subscriber::fmt()
        .with_writer(MakeWebConsoleWriter::new())
        .without_time()
        .with_max_level(Level::INFO)
        .try_init()
        .is_ok()
}
