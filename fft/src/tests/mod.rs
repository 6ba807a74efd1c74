pub(crate) mod generics;
