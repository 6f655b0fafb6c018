#![macro_use]
#![allow(unused_macros)]

// Logging goes to defmt when `use-defmt` is enabled and disappears otherwise. The arguments are
// still borrowed in the disabled case so that they don't trigger unused variable warnings.

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "use-defmt")]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(not(feature = "use-defmt"))]
            { $( let _ = &$x; )* }
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "use-defmt")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(feature = "use-defmt"))]
            { $( let _ = &$x; )* }
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "use-defmt")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(feature = "use-defmt"))]
            { $( let _ = &$x; )* }
        }
    };
}
