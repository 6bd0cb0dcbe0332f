// THEORY (1D Pixel Heuristics):
// The `Pixel` module is the most fundamental unit of the sampler. It is a "dumb"
// data container for one RGB pixel plus the single-pixel heuristics the sticker
// classifier needs: hue, saturation and value. Nothing here looks at neighbors;
// aggregation over a region lives in `Chunk`.
//
// Scale:
// - Hue is reported on the 8-bit half-degree scale (0..=179), so a full turn of
//   the color wheel fits in a byte. Red sits on both ends of that range.
// - Saturation and value are 0..=255.
// Pure grays (zero chroma) report hue 0 and saturation 0.
//
// Photographs handed to the pipeline are opaque, so there is no alpha channel.

pub mod pixel {
    pub type Channel = u8;
    pub type NormalizedChannel = f32;
    /// Hue on the 0..=179 scale.
    pub type Hue = u8;
    /// HSV saturation on the 0..=255 scale.
    pub type Saturation = u8;
    /// HSV value on the 0..=255 scale.
    pub type Value = u8;

    /// Number of hue steps in a full turn of the color wheel.
    pub const HUE_PERIOD: u16 = 180;

    /// A "dumb" data container representing a single opaque RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        fn normalized(&self) -> (NormalizedChannel, NormalizedChannel, NormalizedChannel) {
            (
                self.red as NormalizedChannel / 255.0,
                self.green as NormalizedChannel / 255.0,
                self.blue as NormalizedChannel / 255.0,
            )
        }

        /// Hue on the half-degree scale [0, 180).
        ///
        /// - Computed from normalized sRGB; no linearization. Sticker colors are far
        ///   apart on the wheel, so the gamma bias does not matter here.
        /// - Zero-chroma pixels (grays, white, black) return 0.
        pub fn hue(&self) -> Hue {
            let (red, green, blue) = self.normalized();
            let maximum_channel = red.max(green.max(blue));
            let minimum_channel = red.min(green.min(blue));
            let chroma = maximum_channel - minimum_channel;

            if chroma <= 1e-6 {
                return 0;
            }

            let (base_difference, sector_offset) = if maximum_channel == red {
                (green - blue, 0.0)
            } else if maximum_channel == green {
                (blue - red, 2.0)
            } else {
                (red - green, 4.0)
            };

            let mut hue_degrees = (base_difference / chroma + sector_offset) * 60.0;
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }

            let half_degrees = (hue_degrees / 2.0).round() as u16;
            (half_degrees % HUE_PERIOD) as Hue
        }

        /// HSV saturation: chroma relative to value, scaled to 0..=255.
        /// Drops to zero for black, even if a hue is defined.
        pub fn saturation(&self) -> Saturation {
            let maximum_channel = self.red.max(self.green.max(self.blue));
            if maximum_channel == 0 {
                return 0;
            }
            let minimum_channel = self.red.min(self.green.min(self.blue));
            let chroma = (maximum_channel - minimum_channel) as f32;
            (chroma * 255.0 / maximum_channel as f32).round() as Saturation
        }

        /// HSV value: the brightest channel.
        pub fn value(&self) -> Value {
            self.red.max(self.green.max(self.blue))
        }

        /// All three HSV components at once.
        pub fn hsv(&self) -> (Hue, Saturation, Value) {
            (self.hue(), self.saturation(), self.value())
        }
    }

    impl From<image::Rgb<u8>> for Pixel {
        fn from(rgb: image::Rgb<u8>) -> Self {
            let [red, green, blue] = rgb.0;
            Pixel::new(red, green, blue)
        }
    }

    impl From<&image::Rgb<u8>> for Pixel {
        fn from(rgb: &image::Rgb<u8>) -> Self {
            Pixel::from(*rgb)
        }
    }
}
