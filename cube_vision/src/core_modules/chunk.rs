// THEORY:
// The `Chunk` module represents the block of pixels sampled for one sticker. It is
// the bridge between individual pixels and the single color observation the
// classifier needs.
//
// Key architectural principles:
// 1.  **Spatial Pooling**: A sticker is summarized by one sample taken over a small
//     box at the center of its grid cell, not by any single pixel.
// 2.  **Median, Not Mean**: The core operation is `median_sample`. A per-channel
//     median ignores the minority of pixels hit by glare, shadow or the dark gap
//     between stickers, where a mean would be dragged toward them. Hue is circular,
//     so its median is taken around the circle: red pixels at 179 and 1 must not
//     meet in the middle at 90.
// 3.  **Data Container**: Like `Pixel`, `Chunk` is "dumb". It holds its pixels and
//     knows how to summarize them; it does not know what color it is.

pub mod chunk {
    use crate::core_modules::pixel::pixel::{HUE_PERIOD, Hue, Pixel, Saturation, Value};

    /// The aggregated color of one sampled region, in HSV.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RawSample {
        /// Hue on the 0..=179 scale.
        pub hue: Hue,
        /// Saturation on the 0..=255 scale.
        pub saturation: Saturation,
        /// Value on the 0..=255 scale.
        pub value: Value,
    }

    impl RawSample {
        pub fn new(hue: Hue, saturation: Saturation, value: Value) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }
    }

    impl From<(Hue, Saturation, Value)> for RawSample {
        fn from((hue, saturation, value): (Hue, Saturation, Value)) -> Self {
            RawSample::new(hue, saturation, value)
        }
    }

    /// A "dumb" data container representing a rectangular block of pixels.
    pub struct Chunk {
        /// The width of the chunk in pixels.
        pub width: u32,
        /// The height of the chunk in pixels.
        pub height: u32,
        /// A flattened, row-major vector of the pixels within this chunk.
        pub pixels: Vec<Pixel>,
    }

    impl Chunk {
        pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Self {
            debug_assert_eq!(pixels.len(), (width * height) as usize);
            Self {
                width,
                height,
                pixels,
            }
        }

        /// Per-channel median of the chunk's pixels in HSV.
        /// An empty chunk yields the all-zero sample.
        pub fn median_sample(&self) -> RawSample {
            if self.pixels.is_empty() {
                return RawSample::default();
            }

            let mut hues = Vec::with_capacity(self.pixels.len());
            let mut saturations = Vec::with_capacity(self.pixels.len());
            let mut values = Vec::with_capacity(self.pixels.len());
            for pixel in &self.pixels {
                let (hue, saturation, value) = pixel.hsv();
                hues.push(hue);
                saturations.push(saturation);
                values.push(value);
            }

            RawSample {
                hue: hue_median(&mut hues),
                saturation: median(&mut saturations),
                value: median(&mut values),
            }
        }
    }

    /// Median of a non-empty channel. Even lengths average the two middle values, rounding down.
    fn median(channel: &mut [u8]) -> u8 {
        channel.sort_unstable();
        let middle = channel.len() / 2;
        if channel.len() % 2 == 1 {
            channel[middle]
        } else {
            ((channel[middle - 1] as u16 + channel[middle] as u16) / 2) as u8
        }
    }

    /// Median of a non-empty hue channel, measured around the hue circle.
    ///
    /// The sorted hues are read starting just after the widest empty arc, so a red
    /// cluster straddling 179/0 stays contiguous. Even lengths take the lower middle,
    /// which keeps the result a hue that was actually observed.
    fn hue_median(hues: &mut [Hue]) -> Hue {
        hues.sort_unstable();
        let len = hues.len();

        let mut start = 0;
        let mut widest_gap = hues[0] as u16 + HUE_PERIOD - hues[len - 1] as u16;
        for index in 1..len {
            let gap = (hues[index] - hues[index - 1]) as u16;
            if gap > widest_gap {
                widest_gap = gap;
                start = index;
            }
        }
        hues[(start + (len - 1) / 2) % len]
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::core_modules::color_classifier::ColorClassifier;
        use crate::core_modules::face::StickerColor;

        #[test]
        fn test_median_ignores_glare() {
            // Seven red pixels and two blown-out white ones.
            let mut pixels = vec![Pixel::new(200, 20, 20); 7];
            pixels.push(Pixel::new(255, 255, 255));
            pixels.push(Pixel::new(255, 255, 255));
            let chunk = Chunk::new(3, 3, pixels);

            let sample = chunk.median_sample();
            assert_eq!(sample, RawSample::from(Pixel::new(200, 20, 20).hsv()));
        }

        #[test]
        fn test_median_even_count_rounds_down() {
            let mut values = [10u8, 13, 11, 12];
            assert_eq!(median(&mut values), 11);
            let mut values = [7u8];
            assert_eq!(median(&mut values), 7);
        }

        #[test]
        fn test_hue_median_without_wrap() {
            let mut hues = [60u8, 62, 61, 63];
            assert_eq!(hue_median(&mut hues), 61);
            let mut hues = [100u8, 20, 21];
            assert_eq!(hue_median(&mut hues), 21);
        }

        #[test]
        fn test_hue_median_across_wrap() {
            let mut hues = [179u8, 1, 178, 2];
            assert_eq!(hue_median(&mut hues), 179);
            let mut hues = [0u8, 177, 3, 178, 1];
            assert_eq!(hue_median(&mut hues), 0);
        }

        #[test]
        fn test_red_split_across_wrap_stays_red() {
            // Half the pixels sit just below hue 180, half just above 0.
            let pixels: Vec<Pixel> = (0..900)
                .map(|index| {
                    if index % 2 == 0 {
                        Pixel::new(255, 0, 10)
                    } else {
                        Pixel::new(255, 10, 0)
                    }
                })
                .collect();
            let chunk = Chunk::new(30, 30, pixels);

            let sample = chunk.median_sample();
            assert!(sample.hue == 179 || sample.hue == 1, "hue {}", sample.hue);
            assert_eq!(
                ColorClassifier::default().classify(&sample),
                StickerColor::Red
            );
        }

        #[test]
        fn test_empty_chunk_is_zero_sample() {
            let chunk = Chunk::new(0, 0, Vec::new());
            assert_eq!(chunk.median_sample(), RawSample::default());
        }
    }
}
