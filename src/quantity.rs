macro_rules! quantity {
    ($name:ident, $container:ty, $unit:literal) => {
        #[repr(transparent)]
        #[derive(
            ::derive_more::Add,
            ::derive_more::FromStr,
            ::derive_more::Sub,
            ::serde::Deserialize,
            ::serde::Serialize,
            ::std::clone::Clone,
            ::std::marker::Copy,
            ::std::cmp::PartialEq,
            ::std::cmp::PartialOrd,
        )]
        pub struct $name(pub $container);

        impl $name {
            pub const UNIT: &'static str = $unit;
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, formatter)?;
                write!(formatter, " {}", $unit)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(&self.0, formatter)?;
                write!(formatter, "{}", $unit)
            }
        }
    };
}

quantity!(KilowattHours, f64, "kWh");
quantity!(Won, i64, "원");

impl KilowattHours {
    /// Round to watt-hours, the portal's own display precision.
    #[must_use]
    pub fn round_to_watt_hours(self) -> Self {
        Self((self.0 * 1000.0).round() / 1000.0)
    }
}
