/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Rotation about the X axis, angle in degrees
pub fn rotation_x(degrees: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]]
}

/// Rotation about the Y axis, angle in degrees
pub fn rotation_y(degrees: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [[cos, 0.0, sin], [0.0, 1.0, 0.0], [-sin, 0.0, cos]]
}

/// Rotation about the Z axis, angle in degrees
pub fn rotation_z(degrees: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]]
}

/// Builds the rotation for Euler angles `[pitch, yaw, roll]` in degrees.
///
/// Roll is applied first, then pitch, then yaw.
pub fn euler_rotation(euler: &[f64; 3]) -> [[f64; 3]; 3] {
    let yaw_pitch = multiply_matrices(&rotation_y(euler[1]), &rotation_x(euler[0]));
    multiply_matrices(&yaw_pitch, &rotation_z(euler[2]))
}

pub fn add(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn scale(v: &[f64; 3], factor: f64) -> [f64; 3] {
    [v[0] * factor, v[1] * factor, v[2] * factor]
}

/// Perspective divide onto the z = 0 plane.
///
/// Not guarded: a point at `z == -focal_length` projects to a non-finite value.
pub fn apply_perspective(point: &[f64; 3], focal_length: f64) -> [f64; 3] {
    let factor = focal_length / (focal_length + point[2]);
    [point[0] * factor, point[1] * factor, 0.0]
}
