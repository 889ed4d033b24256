//! Field access over synthetic objects: layouts, categories and nesting.

mod common;

use common::SyntheticObject;
use remodel::{wrapper, wrapper_cast, Field, Operators, RawAddress, Ref, Weak, Wrapper};

wrapper! {
    /// Packed header with fields at awkward offsets.
    pub struct Header(126) {
        pub magic: u64 => offset(0),
        pub length: usize => offset(8),
        pub kind: u8 => offset(124),
        pub valid: bool => offset(125),
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

remodel::trivial!(Vec3);

wrapper! {
    pub struct Transform(0x20) {
        pub position: Vec3 => offset(0x0),
        pub scale: f32 => offset(0xc),
        pub layers: [u16; 4] => offset(0x10),
        pub parent: *mut Transform => offset(0x18),
    }
}

wrapper! {
    pub struct Actor(0x48) {
        pub id: u32 => offset(0x0),
        pub transform: Transform => offset(0x8),
        pub owner: Ref<Transform> => offset(0x28),
        pub health: Ref<i32> => offset(0x40),
    }
}

#[test]
fn test_packed_offsets_do_not_overlap() {
    let mut object = SyntheticObject::new(126);
    let header: Header = unsafe { wrapper_cast(object.address()) };

    header.magic().set(0x7f45_4c46);
    header.length().set(0x1000);
    header.valid().set(true);
    header.kind().set(5);

    assert_eq!(object.read::<u8>(124), 5);
    assert_eq!(object.read::<u8>(125), 1);
    assert!(header.valid().get());
    assert_eq!(header.magic().get(), 0x7f45_4c46);
    assert_eq!(header.length().get(), 0x1000);

    header.kind().set(0xff);
    assert!(header.valid().get());
}

#[test]
fn test_field_tracks_parent_address() {
    let mut first = SyntheticObject::new(126);
    let mut second = SyntheticObject::new(126);
    first.write::<usize>(8, 1);
    second.write::<usize>(8, 2);

    let a: Header = unsafe { wrapper_cast(first.address()) };
    let b: Header = unsafe { wrapper_cast(second.address()) };
    assert_eq!(a.length().get(), 1);
    assert_eq!(b.length().get(), 2);
    assert_eq!(a.length().parent(), first.address());
    assert_eq!(
        a.length().address_of_obj(),
        first.address().add(8)
    );
}

#[test]
fn test_assign_between_objects() {
    let mut first = SyntheticObject::new(126);
    let mut second = SyntheticObject::new(126);
    let a: Header = unsafe { wrapper_cast(first.address()) };
    let b: Header = unsafe { wrapper_cast(second.address()) };
    b.length().set(77);

    a.length().assign(&b.length());
    assert_eq!(first.read::<usize>(8), 77);
    assert_eq!(a.length().parent(), first.address());
    assert_eq!(a.length().getter(), remodel::PtrGetter::offset(8));

    b.length().set(78);
    assert_eq!(a.length().get(), 77);
}

#[test]
fn test_aggregate_and_array_fields() {
    let mut object = SyntheticObject::new(0x20);
    let transform: Transform = unsafe { wrapper_cast(object.address()) };

    transform.position().set(Vec3 { x: 1.0, y: 2.0, z: 3.0 });
    transform.position().update(|p| p.y += 0.5);
    assert_eq!(object.read::<f32>(4), 2.5);
    assert_eq!(
        Field::<Vec3>::operators(),
        Operators::MEMBER_ACCESS
    );

    transform.layers().set([1, 2, 3, 4]);
    transform.layers().element(3).set(40);
    let total: u32 = transform.layers().elements().map(|e| u32::from(e.get())).sum();
    assert_eq!(total, 46);
    assert_eq!(transform.layers().len(), 4);
    assert_eq!(object.read::<u16>(0x16), 40);
}

#[test]
fn test_nested_wrapper_and_weak_identity() {
    let mut object = SyntheticObject::new(0x48);
    let base = object.address();
    let actor: Actor = unsafe { wrapper_cast(base) };

    let transform = actor.transform().get();
    assert_eq!(transform.address_of_obj(), base.add(0x8));
    transform.scale().set(2.0);
    assert_eq!(object.read::<f32>(0x8 + 0xc), 2.0);

    let weak = actor.transform().weak();
    assert_eq!(weak.raw(), base.add(0x8));
    assert_eq!(weak.to_strong(), transform);
    assert_eq!(std::mem::size_of_val(weak), 0x20);
    assert_eq!(weak.as_bytes().len(), 0x20);
}

#[test]
fn test_nested_assignment_copies_declared_size() {
    let mut object = SyntheticObject::new(0x48);
    let mut source_object = SyntheticObject::new(0x20);
    let actor: Actor = unsafe { wrapper_cast(object.address()) };
    let source: Transform = unsafe { wrapper_cast(source_object.address()) };
    source.scale().set(9.0);
    source.layers().set([7; 4]);
    actor.id().set(0xabcd);

    actor.transform().set(source);
    assert_eq!(actor.transform().get().scale().get(), 9.0);
    assert_eq!(actor.transform().get().layers().get(), [7; 4]);
    assert_eq!(actor.id().get(), 0xabcd);
    assert_eq!(actor.transform().get().address_of_obj(), object.address().add(0x8));
}

#[test]
fn test_reference_fields() {
    let mut object = SyntheticObject::new(0x48);
    let mut owner_object = SyntheticObject::new(0x20);
    let mut health = -5i32;
    let owner_addr = owner_object.address();
    object.write::<usize>(0x28, owner_addr.value());
    object.write::<usize>(0x40, RawAddress::from_mut_ptr(&mut health as *mut i32).value());
    let actor: Actor = unsafe { wrapper_cast(object.address()) };

    assert_eq!(actor.owner().get().address_of_obj(), owner_addr);
    actor.owner().get().scale().set(4.0);
    assert_eq!(owner_object.read::<f32>(0xc), 4.0);

    let mut hp = actor.health();
    hp += 15;
    assert!(hp == 10);
    assert_eq!(actor.health().referent().get(), 10);
    assert_eq!(health, 10);
}

#[test]
fn test_pointer_to_wrapper_strides_by_declared_size() {
    let mut nodes = SyntheticObject::new(0x20 * 3);
    let mut head = SyntheticObject::new(0x20);
    let first = nodes.address();
    let transform: Transform = unsafe { wrapper_cast(head.address()) };

    transform.parent().set(first.as_mut_ptr::<Weak<Transform>>());
    assert!(!transform.parent().is_null());
    transform.parent().at(2).get().scale().set(3.5);
    assert_eq!(nodes.read::<f32>(0x40 + 0xc), 3.5);
    assert_eq!(
        transform.parent().target().get().address_of_obj(),
        first
    );
    assert_eq!(
        transform.parent().add(1) as usize,
        first.add(0x20).value()
    );
}
