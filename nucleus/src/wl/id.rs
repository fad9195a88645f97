use crate::ClientId;

/// Wire id of an object in the id space of one client.
pub struct Id<T> {
	pub id: u32,
	_phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> Id<T> {
	pub const fn new(id: u32) -> Self {
		Self {
			id,
			_phantom: std::marker::PhantomData,
		}
	}

	pub fn null() -> Self {
		Self::new(0)
	}

	pub fn is_null(&self) -> bool {
		self.id == 0
	}
}

impl<T> std::ops::Deref for Id<T> {
	type Target = u32;

	fn deref(&self) -> &Self::Target {
		&self.id
	}
}

impl<T> Clone for Id<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl<T> std::fmt::Debug for Id<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.id)
	}
}

impl<T> serde::Serialize for Id<T> {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u32(self.id)
	}
}

struct Visitor;

impl<'de> serde::de::Visitor<'de> for Visitor {
	type Value = u32;

	fn visit_u32<E: serde::de::Error>(self, value: u32) -> std::result::Result<Self::Value, E> {
		Ok(value)
	}

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("an u32")
	}
}

impl<'de, T> serde::Deserialize<'de> for Id<T> {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(Self::new(deserializer.deserialize_u32(Visitor)?))
	}
}

/// Untyped reference to a live resource. The generation distinguishes a resource from a
/// later one that reuses the same wire id, so a stale reference never resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectRef {
	pub client: ClientId,
	pub id: u32,
	pub generation: u32,
}

/// Typed weak reference to a resource.
pub struct Handle<T> {
	pub object: ObjectRef,
	_phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
	pub const fn new(object: ObjectRef) -> Self {
		Self {
			object,
			_phantom: std::marker::PhantomData,
		}
	}

	pub fn client(&self) -> ClientId {
		self.object.client
	}

	pub fn id(&self) -> Id<T> {
		Id::new(self.object.id)
	}
}

impl<T> Clone for Handle<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
	fn eq(&self, other: &Self) -> bool {
		self.object == other.object
	}
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.object.hash(state)
	}
}

impl<T> std::fmt::Debug for Handle<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = std::any::type_name::<T>().rsplit("::").next().unwrap_or("?");
		write!(f, "{name}@{}({:?})", self.object.id, self.object.client)
	}
}

impl<T> From<Handle<T>> for ObjectRef {
	fn from(value: Handle<T>) -> Self {
		value.object
	}
}

impl<T> From<&Handle<T>> for ObjectRef {
	fn from(value: &Handle<T>) -> Self {
		value.object
	}
}

/// Serializes as the wire id. Only meaningful in messages to the owning client.
impl<T> serde::Serialize for Handle<T> {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u32(self.object.id)
	}
}
