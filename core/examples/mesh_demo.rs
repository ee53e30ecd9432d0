use landscape::{GenerationParameters, TerrainMeshBuilder, TerrainPalette};

fn main() {
    // 32×32 cells, seed 2025, buttes filter on
    let params = GenerationParameters {
        resolution: 32,
        seed: 2025,
        filter_enabled: true,
        sharpness: 5.0,
        ..Default::default()
    };
    let builder = TerrainMeshBuilder::new(TerrainPalette::default());
    let mesh = match builder.build(&params) {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("build failed: {e}");
            return;
        }
    };

    println!(
        "{} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    // Print the heights of the top-left 12×12 corner of the grid
    let row = params.resolution as usize + 1;
    for z in 0..12 {
        for x in 0..12 {
            print!("{:>7.2} ", mesh.vertices[z * row + x][1]);
        }
        println!();
    }
}
