// src/debugger/macros.rs

#[macro_export]
macro_rules! vm_log {
    ($sink:expr, $level:expr, $component:expr, $($arg:tt)*) => {{
        #[allow(unused_imports)]
        use $crate::debugger::LogSink as _;
        let sink = &$sink;
        if sink.enabled($level) {
            sink.record($level, $component, &format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! vm_error {
    ($sink:expr, $component:expr, $($arg:tt)*) => {
        $crate::vm_log!($sink, $crate::debugger::DebugLevel::Error, $component, $($arg)*)
    };
}

#[macro_export]
macro_rules! vm_warn {
    ($sink:expr, $component:expr, $($arg:tt)*) => {
        $crate::vm_log!($sink, $crate::debugger::DebugLevel::Warn, $component, $($arg)*)
    };
}

#[macro_export]
macro_rules! vm_info {
    ($sink:expr, $component:expr, $($arg:tt)*) => {
        $crate::vm_log!($sink, $crate::debugger::DebugLevel::Info, $component, $($arg)*)
    };
}

#[macro_export]
macro_rules! vm_debug {
    ($sink:expr, $component:expr, $($arg:tt)*) => {
        $crate::vm_log!($sink, $crate::debugger::DebugLevel::Debug, $component, $($arg)*)
    };
}

#[macro_export]
macro_rules! vm_trace {
    ($sink:expr, $component:expr, $($arg:tt)*) => {
        $crate::vm_log!($sink, $crate::debugger::DebugLevel::Trace, $component, $($arg)*)
    };
}
