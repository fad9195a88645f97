mod common;

use common::{ops, TestClient};
use nucleus::{wl, Display};

#[test]
fn registry_follows_global_changes() {
	let mut display = Display::new();
	display.add_global(wl::Compositor).unwrap();

	let mut client = TestClient::connect(&mut display);
	assert_eq!(client.globals.len(), 1);
	assert_eq!(client.globals[0].1, "wl_compositor");

	let name = display.add_global(wl::SubCompositor).unwrap();
	client.events(&mut display);
	assert!(client.globals.iter().any(|x| x.0 == name));

	display.remove_global(name).unwrap();
	client.events(&mut display);
	assert!(client.globals.iter().all(|x| x.0 != name));
}

#[test]
fn binds_turn_inert_when_the_global_goes_away() {
	let mut display = Display::new();
	let name = display.add_global(wl::Compositor).unwrap();

	let mut client = TestClient::connect(&mut display);
	let compositor = client.bind(&mut display, "wl_compositor", 4);

	display.remove_global(name).unwrap();
	client.events(&mut display);

	let handle = display.lookup::<wl::Compositor>(client.id, compositor).unwrap();
	assert!(display.is_inert(handle));

	// requests to inert objects are dropped without an error
	client.create(&mut display, compositor, 0);
	assert!(display.objects::<wl::Surface>(client.id).is_empty());
	assert!(client.protocol_error(&mut display).is_none());
}

#[test]
fn racing_bind_resolves_until_the_tick_ends() {
	let mut display = Display::new();
	let name = display.add_global(wl::Compositor).unwrap();

	let mut client = TestClient::connect(&mut display);
	display.remove_global(name).unwrap();

	// the client has not seen global_remove yet
	let compositor = client.bind_name(&mut display, name, "wl_compositor", 4);
	let handle = display.lookup::<wl::Compositor>(client.id, compositor).unwrap();

	assert!(display.is_inert(handle));
	assert!(client.protocol_error(&mut display).is_none());

	display.finish_tick();
	assert!(!display.has_global(name));

	client.bind_name(&mut display, name, "wl_compositor", 4);

	let (object, code, _) = client.protocol_error(&mut display).unwrap();
	assert_eq!(object, client.registry);
	assert_eq!(code, wl::INVALID_OBJECT);
	assert!(display.client(client.id).unwrap().is_errored());
}

#[test]
fn bind_checks_interface_and_version() {
	let mut display = Display::new();
	let name = display.add_global(wl::Compositor).unwrap();

	let mut client = TestClient::connect(&mut display);
	client.bind_name(&mut display, name, "wl_compositor", 5);

	let (_, code, _) = client.protocol_error(&mut display).unwrap();
	assert_eq!(code, wl::INVALID_OBJECT);

	let mut client = TestClient::connect(&mut display);
	client.bind_name(&mut display, name, "wl_seat", 1);

	let (_, code, _) = client.protocol_error(&mut display).unwrap();
	assert_eq!(code, wl::INVALID_OBJECT);
}

#[test]
fn errored_clients_are_ignored() {
	let mut display = Display::new();
	display.add_global(wl::Compositor).unwrap();

	let mut client = TestClient::connect(&mut display);
	client.request(&mut display, 77, 0, ());

	let (object, code, _) = client.protocol_error(&mut display).unwrap();
	assert_eq!((object, code), (1, wl::INVALID_OBJECT));

	// neither requests nor events go through anymore
	let compositor = client.bind(&mut display, "wl_compositor", 4);
	assert!(display.lookup::<wl::Compositor>(client.id, compositor).is_err());
	assert!(client.events(&mut display).is_empty());
}

#[test]
fn unknown_opcodes_are_invalid_method() {
	let mut display = Display::new();
	display.add_global(wl::Compositor).unwrap();

	let mut client = TestClient::connect(&mut display);
	let compositor = client.bind(&mut display, "wl_compositor", 4);
	client.request(&mut display, compositor, 9, ());

	let (object, code, _) = client.protocol_error(&mut display).unwrap();
	assert_eq!((object, code), (compositor, wl::INVALID_METHOD));
}

#[test]
fn sync_reports_the_current_serial() {
	let mut display = Display::new();
	let mut client = TestClient::connect(&mut display);

	let first = display.next_serial();
	let second = display.next_serial();
	assert!(second > first);

	let callback = client.create(&mut display, 1, 0);
	let events = client.events(&mut display);

	let done = events
		.iter()
		.find(|x| x.object == callback && x.op == 0)
		.unwrap();
	assert_eq!(done.decode::<u32>(), second);

	// the callback is gone right away and its id is released
	let deleted = events
		.iter()
		.find(|x| x.object == 1 && x.op == 1)
		.map(|x| x.decode::<u32>());
	assert_eq!(deleted, Some(callback));
	assert!(display.lookup::<wl::Callback>(client.id, callback).is_err());
}

#[test]
fn destroying_a_client_tears_down_its_objects() {
	let mut display = Display::new();
	display.add_global(wl::Compositor).unwrap();

	let mut client = TestClient::connect(&mut display);
	let compositor = client.bind(&mut display, "wl_compositor", 4);
	client.create(&mut display, compositor, 0);
	client.create(&mut display, compositor, 0);
	assert_eq!(display.objects::<wl::Surface>(client.id).len(), 2);

	display.destroy_client(client.id).unwrap();

	assert!(display.client(client.id).is_none());
	assert!(display.all_objects::<wl::Surface>().is_empty());
	assert!(ops(&client.events(&mut display), 1).is_empty());
}
