//! Access to the host-owned blackout flags.
//!
//! The two flags are plain booleans inside the host image, found through
//! signature resolution. They are modeled as an injected capability so
//! the interception body can run against test doubles.

/// Get/set capability over one externally-owned boolean flag.
pub trait FlagAccess {
    fn get(&self) -> bool;
    fn set(&self, value: bool);
}

/// The artificial-lights flag and its vehicle-lights sibling, always
/// handled as a pair.
#[derive(Debug)]
pub struct FlagPair<F> {
    pub lights: F,
    pub vehicle_lights: F,
}

impl<F: FlagAccess> FlagPair<F> {
    pub fn new(lights: F, vehicle_lights: F) -> Self {
        Self {
            lights,
            vehicle_lights,
        }
    }

    pub fn snapshot(&self) -> (bool, bool) {
        (self.lights.get(), self.vehicle_lights.get())
    }

    pub fn force_off(&self) {
        self.lights.set(false);
        self.vehicle_lights.set(false);
    }

    pub fn restore(&self, (lights, vehicle_lights): (bool, bool)) {
        self.lights.set(lights);
        self.vehicle_lights.set(vehicle_lights);
    }
}

/// Flag reached through its resolved absolute address. Reads and writes
/// are volatile: unrelated host code touches the same byte, and the
/// relationship with those writers is best-effort by design.
#[derive(Debug, Clone, Copy)]
pub struct RawFlag(*mut bool);

impl RawFlag {
    /// # Safety
    ///
    /// `addr` must be the resolved address of a process-lifetime boolean
    /// flag that stays mapped and writable for the rest of the process.
    pub unsafe fn from_addr(addr: u64) -> Self {
        Self(addr as *mut bool)
    }
}

impl FlagAccess for RawFlag {
    fn get(&self) -> bool {
        // SAFETY: the constructor's contract guarantees a live mapping.
        unsafe { self.0.read_volatile() }
    }

    fn set(&self, value: bool) {
        // SAFETY: as above.
        unsafe { self.0.write_volatile(value) }
    }
}

// The pointed-to flags are process-lifetime statics in the host image.
unsafe impl Send for RawFlag {}
unsafe impl Sync for RawFlag {}
