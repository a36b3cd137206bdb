use synthraster::projection::epsg;
use synthraster::{
    AffineTransform, DataType, MemoryStore, Raster, RasterFactory, ReclassTable, ResampleMethod,
    Result, ScaledProjection,
};

fn main() -> Result<()> {
    println!("synthraster - synthetic raster walkthrough\n");

    let affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 3.0)?;
    let factory = RasterFactory::new(epsg::WGS84, DataType::F64, Some(-9999.0), 3, 4, affine)?;

    let a = factory.alternating(1.0, 2.0)?;
    println!("{}", a);

    println!("--- Algebra ---");
    let doubled = a.add(&a)?;
    println!("(a + a)[0,0] = {}", doubled.pixel(1, 0, 0)?);
    let powered = a.pow(&a)?;
    println!("(a ** a)[0,0] = {}", powered.pixel(1, 0, 0)?);
    println!("min = {}, max = {}, mean = {}", a.min()?, a.max()?, a.mean()?);

    println!("\n--- Reclassification ---");
    let table = ReclassTable::from_pairs([(1.0, 10.0), (2.0, 20.0)]);
    let reclassed = a.reclass(&table, None)?;
    println!("reclassed[0,0] = {}", reclassed.pixel(1, 0, 0)?);

    println!("\n--- Alignment ---");
    let shifted_affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 4.0)?;
    let shifted_factory =
        RasterFactory::new(epsg::WGS84, DataType::F64, Some(-9999.0), 3, 4, shifted_affine)?;
    let b = shifted_factory.uniform(5.0)?;
    println!("is_aligned(a, b) = {}", a.is_aligned(&b));
    let b_aligned = b.align_to(&a, ResampleMethod::Nearest)?;
    println!("after align_to: {}", a.is_aligned(&b_aligned));

    println!("\n--- Reprojection ---");
    let service = ScaledProjection::new(epsg::WGS84, epsg::UTM_31N, 111_000.0);
    let projected = a.reproject(epsg::UTM_31N, ResampleMethod::Nearest, Some(1000.0), &service)?;
    let (rows, cols) = projected.shape();
    println!("reprojected to EPSG:{}: {}x{}", projected.crs(), rows, cols);

    println!("\n--- Store round-trip ---");
    let store = MemoryStore::new();
    a.write_to_store(&store, "checkerboard")?;
    let loaded = Raster::from_store(&store, "checkerboard")?;
    println!("loaded[0,1] = {}", loaded.pixel(1, 0, 1)?);

    Ok(())
}
