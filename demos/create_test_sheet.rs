use image::{Rgb, RgbImage};

fn main() -> anyhow::Result<()> {
    let mut img = RgbImage::from_pixel(2000, 900, Rgb([225, 225, 225]));

    // Three dark frames, the middle one without a specimen
    for (i, x0) in [50u32, 700, 1350].into_iter().enumerate() {
        for y in 100..800 {
            for x in x0..x0 + 620 {
                img.put_pixel(x, y, Rgb([30, 30, 30]));
            }
        }
        if i != 1 {
            for y in 250..650 {
                for x in x0 + 250..x0 + 350 {
                    img.put_pixel(x, y, Rgb([230, 120, 30]));
                }
            }
        }
    }

    img.save("test_sheet.png")?;
    println!("Created test_sheet.png (2000x900, 3 frames, 2 specimens)");
    Ok(())
}
