macro_rules! define_casting_integral {
    ($ty:ident, $variant:ident) => {
        impl TryFrom<$crate::IntegralValue> for $ty {
            type Error = anyhow::Error;

            fn try_from(value: $crate::IntegralValue) -> Result<Self, Self::Error> {
                let wide = value.widen();
                <$ty>::try_from(wide).map_err(|_| {
                    anyhow::anyhow!("{} is out of range for {}", wide, stringify!($ty))
                })
            }
        }

        impl From<$ty> for $crate::IntegralValue {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

pub(crate) use define_casting_integral;
