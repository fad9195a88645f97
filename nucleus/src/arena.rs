/// Generational key into an [`Arena`]. A key outlives its value safely: once the slot is
/// reused, lookups with the old key fail instead of aliasing the new value.
pub struct Key<T> {
	index: u32,
	generation: u32,
	_phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> Key<T> {
	fn new(index: u32, generation: u32) -> Self {
		Self {
			index,
			generation,
			_phantom: std::marker::PhantomData,
		}
	}
}

impl<T> Clone for Key<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Key<T> {}

impl<T> PartialEq for Key<T> {
	fn eq(&self, other: &Self) -> bool {
		self.index == other.index && self.generation == other.generation
	}
}

impl<T> Eq for Key<T> {}

impl<T> std::hash::Hash for Key<T> {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.index.hash(state);
		self.generation.hash(state);
	}
}

impl<T> std::fmt::Debug for Key<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}v{}", self.index, self.generation)
	}
}

enum Slot<T> {
	Occupied { generation: u32, value: T },
	Vacant { generation: u32 },
}

pub struct Arena<T> {
	slots: Vec<Slot<T>>,
	len: usize,
}

impl<T> Default for Arena<T> {
	fn default() -> Self {
		Self {
			slots: Vec::new(),
			len: 0,
		}
	}
}

impl<T> Arena<T> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, value: T) -> Key<T> {
		self.len += 1;

		let vacant = self
			.slots
			.iter()
			.position(|x| matches!(x, Slot::Vacant { .. }));

		match vacant {
			Some(index) => {
				let generation = match self.slots[index] {
					Slot::Vacant { generation } => generation + 1,
					Slot::Occupied { generation, .. } => generation,
				};

				self.slots[index] = Slot::Occupied { generation, value };
				Key::new(index as u32, generation)
			}
			None => {
				self.slots.push(Slot::Occupied {
					generation: 0,
					value,
				});

				Key::new(self.slots.len() as u32 - 1, 0)
			}
		}
	}

	pub fn remove(&mut self, key: Key<T>) -> Option<T> {
		let slot = self.slots.get_mut(key.index as usize)?;

		if !matches!(slot, Slot::Occupied { generation, .. } if *generation == key.generation) {
			return None;
		}

		let old = std::mem::replace(
			slot,
			Slot::Vacant {
				generation: key.generation,
			},
		);

		self.len -= 1;

		match old {
			Slot::Occupied { value, .. } => Some(value),
			Slot::Vacant { .. } => None,
		}
	}

	pub fn get(&self, key: Key<T>) -> Option<&T> {
		match self.slots.get(key.index as usize)? {
			Slot::Occupied { generation, value } if *generation == key.generation => Some(value),
			_ => None,
		}
	}

	pub fn get_mut(&mut self, key: Key<T>) -> Option<&mut T> {
		match self.slots.get_mut(key.index as usize)? {
			Slot::Occupied { generation, value } if *generation == key.generation => Some(value),
			_ => None,
		}
	}

	pub fn contains(&self, key: Key<T>) -> bool {
		self.get(key).is_some()
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn keys(&self) -> Vec<Key<T>> {
		self.iter().map(|(key, _)| key).collect()
	}

	pub fn iter(&self) -> impl Iterator<Item = (Key<T>, &T)> {
		self.slots
			.iter()
			.enumerate()
			.filter_map(|(index, slot)| match slot {
				Slot::Occupied { generation, value } => {
					Some((Key::new(index as u32, *generation), value))
				}
				Slot::Vacant { .. } => None,
			})
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = (Key<T>, &mut T)> {
		self.slots
			.iter_mut()
			.enumerate()
			.filter_map(|(index, slot)| match slot {
				Slot::Occupied { generation, value } => {
					Some((Key::new(index as u32, *generation), value))
				}
				Slot::Vacant { .. } => None,
			})
	}
}

#[cfg(test)]
mod tests {
	use super::Arena;

	#[test]
	fn stale_keys_do_not_alias() {
		let mut arena = Arena::new();

		let a = arena.insert("a");
		assert_eq!(arena.remove(a), Some("a"));

		let b = arena.insert("b");

		assert_ne!(a, b);
		assert_eq!(arena.get(a), None);
		assert_eq!(arena.get(b), Some(&"b"));
		assert_eq!(arena.len(), 1);
	}

	#[test]
	fn iteration_skips_vacant_slots() {
		let mut arena = Arena::new();

		let keys = [arena.insert(1), arena.insert(2), arena.insert(3)];
		arena.remove(keys[1]);

		let values = arena.iter().map(|(_, x)| *x).collect::<Vec<_>>();
		assert_eq!(values, [1, 3]);
		assert_eq!(arena.keys(), [keys[0], keys[2]]);
	}
}
