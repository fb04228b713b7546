//! Build-time vector binding

/// Generate the receive and transmit vector functions for port statics.
///
/// Each entry names a `static` engine and the two handler functions to
/// create for it. A misspelled or missing static fails to compile.
///
/// ```ignore
/// static SERIAL0: UartEngine<Usart0> = UartEngine::new(Usart0, F_CPU);
///
/// uart_vectors! {
///     SERIAL0 => (USART0_RXC, USART0_DRE),
/// }
/// ```
#[macro_export]
macro_rules! uart_vectors {
    ($($port:path => ($rx:ident, $tx:ident)),+ $(,)?) => {$(
        #[allow(non_snake_case)]
        pub fn $rx() {
            $crate::PortVectors::on_rx_complete(&$port)
        }

        #[allow(non_snake_case)]
        pub fn $tx() {
            $crate::PortVectors::on_tx_empty(&$port)
        }
    )+};
}
