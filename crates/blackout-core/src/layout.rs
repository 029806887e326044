//! Layout constants for the opaque engine structures this subsystem
//! touches.
//!
//! These offsets mirror an undocumented binary layout owned by the host.
//! Keep every raw-offset access in this module so a game update that
//! shifts a field has exactly one place to fix, pinned by the assertion
//! tests below.

use std::ffi::c_void;

use crate::registry::EntityId;

/// `CLightEntity::m_parentEntity`. The field is a registered reference
/// wrapper whose first word is the entity pointer itself.
pub const LIGHT_ENTITY_PARENT: usize = 0xD0;

/// Read the parent entity out of a light entity.
///
/// A null light entity and a null parent both yield `None`; the caller
/// treats either as "no override, plain passthrough".
///
/// # Safety
///
/// `light_entity` must be null or point at a live light-entity object of
/// at least `LIGHT_ENTITY_PARENT + 8` bytes.
pub unsafe fn parent_entity(light_entity: *const c_void) -> Option<EntityId> {
    if light_entity.is_null() {
        return None;
    }

    // SAFETY: non-null per the check above; in-bounds per the caller's
    // contract.
    let parent = unsafe {
        light_entity
            .byte_add(LIGHT_ENTITY_PARENT)
            .cast::<*const c_void>()
            .read_unaligned()
    };
    EntityId::from_ptr(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[repr(C)]
    struct FakeLightEntity {
        _head: [u8; LIGHT_ENTITY_PARENT],
        parent: *const c_void,
    }

    #[test]
    fn test_parent_field_offset() {
        assert_eq!(offset_of!(FakeLightEntity, parent), LIGHT_ENTITY_PARENT);
    }

    #[test]
    fn test_reads_parent_pointer() {
        let marker = 0xBEEFusize as *const c_void;
        let entity = FakeLightEntity {
            _head: [0; LIGHT_ENTITY_PARENT],
            parent: marker,
        };

        let id = unsafe { parent_entity(&entity as *const _ as *const c_void) };
        assert_eq!(id, EntityId::from_ptr(marker));
        assert_eq!(id.unwrap().raw(), 0xBEEF);
    }

    #[test]
    fn test_null_cases() {
        assert_eq!(unsafe { parent_entity(std::ptr::null()) }, None);

        let entity = FakeLightEntity {
            _head: [0; LIGHT_ENTITY_PARENT],
            parent: std::ptr::null(),
        };
        assert_eq!(
            unsafe { parent_entity(&entity as *const _ as *const c_void) },
            None
        );
    }
}
