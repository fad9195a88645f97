use crate::wl;

pub const CLIENT_START: u32 = 1;
pub const SERVER_START: u32 = 0xff000000;

pub struct Slot {
	pub resource: wl::Resource,
	pub version: u32,
	pub generation: u32,
	/// Set once the global behind a bind is gone. Only destructor requests are
	/// processed and no events are sent.
	pub inert: bool,
	/// Name of the global this resource is a bind of.
	pub global: Option<u32>,
}

/// Objects of one id space, indexed by wire id relative to `START`.
pub struct Store<const START: u32> {
	objects: Vec<Option<Slot>>,
	len: usize,
}

impl<const START: u32> Default for Store<START> {
	fn default() -> Self {
		Self {
			objects: Vec::new(),
			len: 0,
		}
	}
}

impl<const START: u32> Store<START> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains_id(id: u32) -> bool {
		let end = if START == SERVER_START {
			u32::MAX
		} else {
			SERVER_START - 1
		};

		(START..=end).contains(&id)
	}

	pub fn insert(&mut self, id: u32, slot: Slot) -> crate::Result<()> {
		if !Self::contains_id(id) {
			color_eyre::eyre::bail!("id {id} is outside of this id space");
		}

		let index = Self::id_to_index(id);

		// ids are handed out densely, same as libwayland's map
		if index > self.objects.len() {
			color_eyre::eyre::bail!("id {id} skips ahead of the next free id");
		}

		if index == self.objects.len() {
			self.objects.push(None);
		}

		if self.objects[index].is_some() {
			color_eyre::eyre::bail!("id {id} is already in use");
		}

		self.objects[index] = Some(slot);
		self.len += 1;

		Ok(())
	}

	/// Picks the lowest free id.
	pub fn allocate(&mut self, slot: Slot) -> u32 {
		let index = self
			.objects
			.iter()
			.position(Option::is_none)
			.unwrap_or(self.objects.len());

		if index == self.objects.len() {
			self.objects.push(None);
		}

		self.objects[index] = Some(slot);
		self.len += 1;

		START + index as u32
	}

	pub fn remove(&mut self, id: u32) -> Option<Slot> {
		if !Self::contains_id(id) {
			return None;
		}

		let ret = self.objects.get_mut(Self::id_to_index(id))?.take();

		if ret.is_some() {
			self.len -= 1;
		}

		ret
	}

	pub fn get(&self, id: u32) -> Option<&Slot> {
		if !Self::contains_id(id) {
			return None;
		}

		self.objects.get(Self::id_to_index(id))?.as_ref()
	}

	pub fn get_mut(&mut self, id: u32) -> Option<&mut Slot> {
		if !Self::contains_id(id) {
			return None;
		}

		self.objects.get_mut(Self::id_to_index(id))?.as_mut()
	}

	pub fn iter(&self) -> impl Iterator<Item = (u32, &Slot)> {
		self.objects
			.iter()
			.enumerate()
			.filter_map(|(index, x)| x.as_ref().map(|x| (START + index as u32, x)))
	}

	pub fn len(&self) -> usize {
		self.len
	}

	fn id_to_index(id: u32) -> usize {
		(id - START) as usize
	}
}

#[cfg(test)]
mod tests {
	use super::{Slot, Store, CLIENT_START, SERVER_START};
	use crate::wl;

	fn slot(generation: u32) -> Slot {
		Slot {
			resource: wl::Callback.into(),
			version: 1,
			generation,
			inert: false,
			global: None,
		}
	}

	#[test]
	fn client_ids_must_be_fresh() {
		let mut store = Store::<CLIENT_START>::new();

		store.insert(1, slot(0)).unwrap();
		store.insert(2, slot(0)).unwrap();
		assert!(store.insert(2, slot(1)).is_err());
		assert!(store.insert(0, slot(1)).is_err());
		assert!(store.insert(7, slot(1)).is_err());
		assert!(store.insert(SERVER_START, slot(1)).is_err());

		assert_eq!(store.len(), 2);
		assert!(store.remove(2).is_some());
		assert!(store.insert(2, slot(2)).is_ok());
		assert_eq!(store.get(2).map(|x| x.generation), Some(2));
	}

	#[test]
	fn server_ids_reuse_lowest_free() {
		let mut store = Store::<SERVER_START>::new();

		assert_eq!(store.allocate(slot(0)), SERVER_START);
		assert_eq!(store.allocate(slot(1)), SERVER_START + 1);

		store.remove(SERVER_START);
		assert_eq!(store.allocate(slot(2)), SERVER_START);
		assert_eq!(
			store.iter().map(|(id, _)| id).collect::<Vec<_>>(),
			[SERVER_START, SERVER_START + 1]
		);
	}
}
