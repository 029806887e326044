//! Locates the scene-light function and the two blackout flags inside
//! the host image.
//!
//! The function prologue is the anchor; both flag references are then
//! found inside its first bytes and decoded to absolute addresses. The
//! trait seam keeps address sourcing swappable: production scans the
//! live image, tests supply a fixture table.

use tracing::debug;

use crate::error::{Error, Result};
use crate::image::ImageWindow;
use crate::scan::{self, LightingSignatures, Pattern};

/// Absolute addresses of everything the subsystem patches or pokes.
/// Resolved once at initialization; valid for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightingAnchors {
    /// Entry point of the scene-light registration function.
    pub add_scene_light: u64,
    /// The artificial-lights blackout flag.
    pub disable_lights: u64,
    /// The vehicle-lights blackout flag.
    pub disable_veh_lights: u64,
}

pub trait LocateAnchors {
    fn locate(&self) -> Result<LightingAnchors>;
}

/// Production locator: wildcard scan of an image window driven by a
/// [`LightingSignatures`] set.
pub struct SignatureLocator<'a> {
    image: ImageWindow<'a>,
    signatures: LightingSignatures,
}

impl<'a> SignatureLocator<'a> {
    pub fn new(image: ImageWindow<'a>) -> Self {
        Self::with_signatures(image, LightingSignatures::default())
    }

    pub fn with_signatures(image: ImageWindow<'a>, signatures: LightingSignatures) -> Self {
        Self { image, signatures }
    }
}

impl LocateAnchors for SignatureLocator<'_> {
    fn locate(&self) -> Result<LightingAnchors> {
        let prologue = Pattern::parse(&self.signatures.add_scene_light)?;
        let add_scene_light = scan::find_first(&self.image, &prologue, "addSceneLight")?;
        debug!("AddSceneLight located at {:#x}", add_scene_light);

        let flag_ref = &self.signatures.flag_ref;
        let ref_pattern = flag_ref.code.pattern()?;
        let matches = scan::find_in_range(
            &self.image,
            add_scene_light,
            add_scene_light + flag_ref.scan_window as u64,
            &ref_pattern,
        );

        // Both flags are referenced with the same instruction shape; scan
        // order tells them apart (first = lights, second = vehicle lights).
        let disable_lights = match matches.first() {
            Some(&addr) => flag_ref.code.resolve(&self.image, addr)?,
            None => {
                return Err(Error::PatternNotFound {
                    name: "disableArtificialLights".to_string(),
                });
            }
        };
        let disable_veh_lights = match matches.get(1) {
            Some(&addr) => flag_ref.code.resolve(&self.image, addr)?,
            None => {
                return Err(Error::PatternNotFound {
                    name: "disableArtificialVehLights".to_string(),
                });
            }
        };

        debug!(
            "blackout flags located at {:#x} / {:#x}",
            disable_lights, disable_veh_lights
        );

        Ok(LightingAnchors {
            add_scene_light,
            disable_lights,
            disable_veh_lights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::mock::{MockImage, MockImageBuilder};

    const BASE: u64 = 0x1_4000_0000;
    const FUNC: usize = 0x400;

    fn with_prologue() -> MockImageBuilder {
        let signatures = LightingSignatures::default();
        let prologue = Pattern::parse(&signatures.add_scene_light).unwrap();
        MockImage::builder(BASE, 0x1000).put_matching(FUNC, &prologue, 0x11)
    }

    fn plant_flag_ref(builder: MockImageBuilder, at: usize, flag: usize) -> MockImageBuilder {
        let next_ip = at + 7;
        let disp = flag as i64 - next_ip as i64;
        builder
            .put(at, &[0x44, 0x38, 0x25])
            .put_i32(at + 3, i32::try_from(disp).unwrap())
    }

    /// Fixture image with the prologue at `FUNC` and two flag references
    /// inside its scan window, pointing at `flag_a`/`flag_b`.
    fn fixture(flag_a: usize, flag_b: usize) -> MockImage {
        let builder = plant_flag_ref(with_prologue(), FUNC + 0x30, flag_a);
        plant_flag_ref(builder, FUNC + 0x50, flag_b).build()
    }

    #[test]
    fn test_locates_all_anchors() {
        let image = fixture(0x800, 0x808);
        let locator = SignatureLocator::new(image.window());

        let anchors = locator.locate().unwrap();
        assert_eq!(anchors.add_scene_light, BASE + FUNC as u64);
        assert_eq!(anchors.disable_lights, BASE + 0x800);
        assert_eq!(anchors.disable_veh_lights, BASE + 0x808);
    }

    #[test]
    fn test_missing_prologue_is_fatal() {
        let image = MockImage::builder(BASE, 0x1000).build();
        let locator = SignatureLocator::new(image.window());

        let err = locator.locate().unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            Error::PatternNotFound { name } if name == "addSceneLight"
        ));
    }

    #[test]
    fn test_missing_second_flag_ref_is_fatal() {
        let image = plant_flag_ref(with_prologue(), FUNC + 0x30, 0x800).build();

        let locator = SignatureLocator::new(image.window());
        let err = locator.locate().unwrap_err();
        assert!(matches!(
            err,
            Error::PatternNotFound { name } if name == "disableArtificialVehLights"
        ));
    }

    #[test]
    fn test_flag_ref_outside_scan_window_is_ignored() {
        // Second reference past the 0x80-byte window does not count.
        let builder = plant_flag_ref(with_prologue(), FUNC + 0x30, 0x800);
        let image = plant_flag_ref(builder, FUNC + 0x90, 0x808).build();

        let locator = SignatureLocator::new(image.window());
        assert!(locator.locate().is_err());
    }

    #[test]
    fn test_fixture_table_through_trait_seam() {
        struct FixtureAnchors(LightingAnchors);
        impl LocateAnchors for FixtureAnchors {
            fn locate(&self) -> Result<LightingAnchors> {
                Ok(self.0)
            }
        }

        let table = FixtureAnchors(LightingAnchors {
            add_scene_light: 0x1000,
            disable_lights: 0x2000,
            disable_veh_lights: 0x2008,
        });
        let located: &dyn LocateAnchors = &table;
        assert_eq!(located.locate().unwrap().disable_lights, 0x2000);
    }
}
