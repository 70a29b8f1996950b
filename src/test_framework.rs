//! On-target test harness (`custom_test_frameworks`), retained from the
//! teaching kernel this crate grew from for the tier of tests that need a
//! real trap/SBI path and can't run on the host.

use crate::{color_println, println};

pub fn test_runner(tests: &[&dyn Fn()]) {
    println!("running {} on-target test(s)", tests.len());
    for test in tests {
        test();
    }
    color_println!(crate::console::Color::Green, "all on-target tests passed");
    crate::sbi::shutdown(false)
}

#[macro_export]
macro_rules! kernel_test {
    ($name:ident, $body:block) => {
        #[test_case]
        fn $name() {
            $crate::println!("test {} ... ", stringify!($name));
            $body
            $crate::println!("test {} ... ok", stringify!($name));
        }
    };
}
