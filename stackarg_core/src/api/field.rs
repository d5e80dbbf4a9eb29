use std::str::FromStr;

use crate::api::capture::*;
use crate::model::{Action, Arity};
use crate::prelude::{Collectable, Countable};

/// A compile-time accessor from the target `T` to one of its fields `V`.
///
/// Non-capturing closures coerce into this: `|params: &mut Params| &mut params.verbose`.
pub type Accessor<T, V> = fn(&mut T) -> &mut V;

/// A parameter that takes a single value (precisely 1).
pub struct Scalar<T, V> {
    accessor: Accessor<T, V>,
    converter: Box<dyn Converter<V>>,
}

impl<T, V> CliOption for Scalar<T, V> {}
impl<T, V> CliArgument for Scalar<T, V> {}

impl<T, V> Scalar<T, V>
where
    V: FromStr,
    <V as FromStr>::Err: Into<BoxError>,
{
    /// Create a scalar parameter, converted via [`FromStr`].
    pub fn new(accessor: Accessor<T, V>) -> Self {
        Self::with_converter(accessor, FromStrConverter)
    }
}

impl<T, V> Scalar<T, V> {
    /// Create a scalar parameter with a custom [`Converter`].
    pub fn with_converter(
        accessor: Accessor<T, V>,
        converter: impl Converter<V> + 'static,
    ) -> Self {
        Self {
            accessor,
            converter: Box::new(converter),
        }
    }
}

impl<T, V> GenericCapturable<T> for Scalar<T, V> {
    fn action(&self) -> Action {
        Action::Store
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }

    fn matched(&self, _target: &mut T) {
        unreachable!("internal error - a Scalar is only ever captured");
    }

    fn capture(&self, target: &mut T, token: &str) -> Result<(), InvalidConversion> {
        let value = self.converter.convert(token)?;
        *(self.accessor)(target) = value;
        Ok(())
    }
}

/// An option parameter that maps down to [`Option`], taking a single value (precisely 1).
pub struct Optional<T, V> {
    accessor: Accessor<T, Option<V>>,
    converter: Box<dyn Converter<V>>,
}

impl<T, V> CliOption for Optional<T, V> {}

impl<T, V> Optional<T, V>
where
    V: FromStr,
    <V as FromStr>::Err: Into<BoxError>,
{
    /// Create an optional parameter, converted via [`FromStr`].
    pub fn new(accessor: Accessor<T, Option<V>>) -> Self {
        Self::with_converter(accessor, FromStrConverter)
    }
}

impl<T, V> Optional<T, V> {
    /// Create an optional parameter with a custom [`Converter`].
    pub fn with_converter(
        accessor: Accessor<T, Option<V>>,
        converter: impl Converter<V> + 'static,
    ) -> Self {
        Self {
            accessor,
            converter: Box::new(converter),
        }
    }
}

impl<T, V> GenericCapturable<T> for Optional<T, V> {
    fn action(&self) -> Action {
        Action::Store
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }

    fn matched(&self, _target: &mut T) {
        unreachable!("internal error - an Optional is only ever captured");
    }

    fn capture(&self, target: &mut T, token: &str) -> Result<(), InvalidConversion> {
        let value = self.converter.convert(token)?;
        (self.accessor)(target).replace(value);
        Ok(())
    }
}

/// An option parameter that takes no values (precisely 0), storing a constant when matched.
pub struct Switch<T, V> {
    accessor: Accessor<T, V>,
    constant: V,
    action: Action,
}

impl<T, V> CliOption for Switch<T, V> {}

impl<T, V> Switch<T, V> {
    /// Create a switch parameter which stores `constant` when matched.
    pub fn new(accessor: Accessor<T, V>, constant: V) -> Self {
        Self {
            accessor,
            constant,
            action: Action::StoreConst,
        }
    }
}

impl<T> Switch<T, bool> {
    /// Create a switch parameter which stores `true` when matched.
    pub fn store_true(accessor: Accessor<T, bool>) -> Self {
        Self {
            accessor,
            constant: true,
            action: Action::StoreTrue,
        }
    }

    /// Create a switch parameter which stores `false` when matched.
    pub fn store_false(accessor: Accessor<T, bool>) -> Self {
        Self {
            accessor,
            constant: false,
            action: Action::StoreFalse,
        }
    }
}

impl<T, V> GenericCapturable<T> for Switch<T, V>
where
    V: Clone + Send + Sync,
{
    fn action(&self) -> Action {
        self.action
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(0)
    }

    fn matched(&self, target: &mut T) {
        *(self.accessor)(target) = self.constant.clone();
    }

    fn capture(&self, _target: &mut T, _token: &str) -> Result<(), InvalidConversion> {
        unreachable!("internal error - must not capture on a Switch");
    }
}

/// An option parameter that takes no values (precisely 0), incrementing an integer each time it is matched.
/// Ex: `-vvv` for increasing verbosity.
pub struct Counter<T, V> {
    accessor: Accessor<T, V>,
}

impl<T, V> CliOption for Counter<T, V> {}

impl<T, V: Countable> Counter<T, V> {
    /// Create a counter parameter.
    pub fn new(accessor: Accessor<T, V>) -> Self {
        Self { accessor }
    }
}

impl<T, V: Countable> GenericCapturable<T> for Counter<T, V> {
    fn action(&self) -> Action {
        Action::Count
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(0)
    }

    fn matched(&self, target: &mut T) {
        let variable = (self.accessor)(target);
        *variable = variable.increment();
    }

    fn capture(&self, _target: &mut T, _token: &str) -> Result<(), InvalidConversion> {
        unreachable!("internal error - must not capture on a Counter");
    }
}

/// A parameter that takes multiple values (specifiable [`Arity`]), added into a [`Collectable`].
pub struct Collection<T, C, V> {
    accessor: Accessor<T, C>,
    arity: Arity,
    action: Action,
    converter: Box<dyn Converter<V>>,
}

impl<T, C, V> CliOption for Collection<T, C, V> {}
impl<T, C, V> CliArgument for Collection<T, C, V> {}

impl<T, C, V> Collection<T, C, V>
where
    C: Collectable<V>,
    V: FromStr,
    <V as FromStr>::Err: Into<BoxError>,
{
    /// Create a collection parameter which stores `arity` values per occurrence.
    pub fn new(accessor: Accessor<T, C>, arity: Arity) -> Self {
        Self::with_converter(accessor, arity, FromStrConverter)
    }

    /// Create a collection parameter which appends one value per occurrence.
    /// Ex: `--include a --include b`.
    pub fn append(accessor: Accessor<T, C>) -> Self {
        Self::append_many(accessor, Arity::Exactly(1))
    }

    /// Create a collection parameter which appends `arity` values per occurrence.
    pub fn append_many(accessor: Accessor<T, C>, arity: Arity) -> Self {
        let mut collection = Self::with_converter(accessor, arity, FromStrConverter);
        collection.action = Action::Append;
        collection
    }
}

impl<T, C, V> Collection<T, C, V>
where
    C: Collectable<V>,
{
    /// Create a collection parameter with a custom [`Converter`] for its elements.
    pub fn with_converter(
        accessor: Accessor<T, C>,
        arity: Arity,
        converter: impl Converter<V> + 'static,
    ) -> Self {
        Self {
            accessor,
            arity,
            action: Action::Store,
            converter: Box::new(converter),
        }
    }

    /// Replace the element converter.
    pub fn converter(mut self, converter: impl Converter<V> + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }
}

impl<T, C, V> GenericCapturable<T> for Collection<T, C, V>
where
    C: Collectable<V>,
{
    fn action(&self) -> Action {
        self.action
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn matched(&self, _target: &mut T) {
        unreachable!("internal error - a Collection is only ever captured");
    }

    fn capture(&self, target: &mut T, token: &str) -> Result<(), InvalidConversion> {
        let value = self.converter.convert(token)?;
        (self.accessor)(target).add(value);
        Ok(())
    }
}

/// An option parameter that takes no values (precisely 0), appending a constant into a [`Collectable`] when matched.
pub struct ConstAppend<T, C, V> {
    accessor: Accessor<T, C>,
    constant: V,
}

impl<T, C, V> CliOption for ConstAppend<T, C, V> {}

impl<T, C, V> ConstAppend<T, C, V>
where
    C: Collectable<V>,
    V: Clone,
{
    /// Create a constant-appending parameter.
    pub fn new(accessor: Accessor<T, C>, constant: V) -> Self {
        Self { accessor, constant }
    }
}

impl<T, C, V> GenericCapturable<T> for ConstAppend<T, C, V>
where
    C: Collectable<V>,
    V: Clone + Send + Sync,
{
    fn action(&self) -> Action {
        Action::AppendConst
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(0)
    }

    fn matched(&self, target: &mut T) {
        (self.accessor)(target).add(self.constant.clone());
    }

    fn capture(&self, _target: &mut T, _token: &str) -> Result<(), InvalidConversion> {
        unreachable!("internal error - must not capture on a ConstAppend");
    }
}
