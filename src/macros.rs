/// Register a type with the nested deserialization capability so it can be
/// used as a field, array element or dictionary value.
///
/// The type must implement [`JsonDeserializable`](crate::JsonDeserializable)
/// and `Default`. Types declared through [`Serializable`](crate::Serializable)
/// use [`impl_serializable!`](crate::impl_serializable) instead, which calls
/// this macro itself.
#[macro_export]
macro_rules! impl_nested {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::FieldValue for $ty {
            fn declared_type() -> $crate::DeclaredType {
                $crate::DeclaredType::nested::<$ty>()
            }

            fn extract(
                value: &$crate::Value,
                shape: &$crate::Shape,
            ) -> ::std::result::Result<Self, $crate::DeserializeError> {
                $crate::convert::nested_field::<$ty>(value, shape)
            }
        }

        impl $crate::ElementValue for $ty {
            fn element_type() -> $crate::ElementType {
                $crate::ElementType::Nested($crate::TypeRef::of::<$ty>())
            }

            fn from_element(
                value: &$crate::Value,
            ) -> ::std::result::Result<Self, $crate::DeserializeError> {
                $crate::convert::nested_element::<$ty>(value)
            }
        }
    )+};
}

/// Compile-on-first-use deserialization for [`Serializable`](crate::Serializable)
/// types.
///
/// Each type gets its own cell holding its [`Routine`](crate::Routine); a
/// schema error is returned to the caller and compilation is retried on the
/// next use.
#[macro_export]
macro_rules! impl_serializable {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Compiled for $ty {
            fn routine() -> ::std::result::Result<&'static $crate::Routine<Self>, $crate::SchemaError> {
                static ROUTINE: $crate::__private::OnceCell<$crate::Routine<$ty>> =
                    $crate::__private::OnceCell::new();
                ROUTINE.get_or_try_init(|| $crate::Routine::compile($crate::Schema::<$ty>::declared()))
            }
        }

        impl $crate::JsonDeserializable for $ty {
            fn deserialize(
                &mut self,
                document: &$crate::Value,
            ) -> ::std::result::Result<(), $crate::DeserializeError> {
                <$ty as $crate::Compiled>::routine()?.run(document, self)
            }
        }

        $crate::impl_nested!($ty);
    )+};
}
